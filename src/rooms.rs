//! Room Membership Index
//!
//! Derived view mapping room name → set of member connections. Rooms
//! are emergent from membership: the first join under a name creates
//! the entry, and the entry is discarded when its set empties. There
//! is no Room object with its own lifecycle.

use std::collections::{HashMap, HashSet};

use crate::types::{ConnectionId, RoomName};

/// Index of room memberships, keyed by room name
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: HashMap<RoomName, HashSet<ConnectionId>>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Add a connection to a room's member set
    ///
    /// Creates the set on first use. Idempotent: joining a room the
    /// connection is already a member of changes nothing.
    pub fn join(&mut self, room: RoomName, id: ConnectionId) {
        self.rooms.entry(room).or_default().insert(id);
    }

    /// Remove a connection from a room's member set
    ///
    /// Drops the entry when the set becomes empty, so no dangling
    /// empty rooms persist.
    pub fn leave(&mut self, room: &RoomName, id: ConnectionId) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    /// Iterate the current members of a room
    ///
    /// Internal to the router's fan-out; there is no external
    /// list-members capability in the protocol.
    pub fn members(&self, room: &RoomName) -> impl Iterator<Item = ConnectionId> + '_ {
        self.rooms.get(room).into_iter().flatten().copied()
    }

    /// Number of members currently in a room (0 if it has no entry)
    pub fn member_count(&self, room: &RoomName) -> usize {
        self.rooms.get(room).map_or(0, HashSet::len)
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_join_creates_room() {
        let mut index = RoomIndex::new();
        let id = ConnectionId::new();

        assert_eq!(index.room_count(), 0);
        index.join(RoomName::new("X"), id);
        assert_eq!(index.room_count(), 1);
        assert_eq!(index.member_count(&RoomName::new("X")), 1);
    }

    #[test]
    fn test_join_idempotent() {
        let mut index = RoomIndex::new();
        let id = ConnectionId::new();

        index.join(RoomName::new("X"), id);
        index.join(RoomName::new("X"), id);

        assert_eq!(index.member_count(&RoomName::new("X")), 1);
    }

    #[test]
    fn test_leave_drops_empty_entry() {
        let mut index = RoomIndex::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let room = RoomName::new("X");

        index.join(room.clone(), a);
        index.join(room.clone(), b);

        index.leave(&room, a);
        assert_eq!(index.member_count(&room), 1);
        assert_eq!(index.room_count(), 1);

        index.leave(&room, b);
        assert_eq!(index.member_count(&room), 0);
        assert_eq!(index.room_count(), 0);
    }

    #[test]
    fn test_leave_unknown_room_is_noop() {
        let mut index = RoomIndex::new();
        index.leave(&RoomName::new("nope"), ConnectionId::new());
        assert_eq!(index.room_count(), 0);
    }

    #[test]
    fn test_members_scoped_per_room() {
        let mut index = RoomIndex::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        index.join(RoomName::new("X"), a);
        index.join(RoomName::new("Y"), b);

        let x_members: Vec<_> = index.members(&RoomName::new("X")).collect();
        assert_eq!(x_members, vec![a]);
        let y_members: Vec<_> = index.members(&RoomName::new("Y")).collect();
        assert_eq!(y_members, vec![b]);
    }
}
