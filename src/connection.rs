//! Connection struct definition
//!
//! Represents one live transport-level session with its state and
//! outbound event channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::{ConnectionId, RoomName};

/// Live connection record
///
/// Holds the connection's unique ID, its display name (set at join
/// time), the server → client event channel, and its current room.
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier, assigned at accept time
    pub id: ConnectionId,
    /// Display name (None before the first join_group with a name)
    pub display_name: Option<String>,
    /// Server → Client event channel
    pub sender: mpsc::Sender<ServerEvent>,
    /// Room this connection currently belongs to
    pub room: Option<RoomName>,
}

impl Connection {
    /// Create a new connection record with no room and no display name
    pub fn new(id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            id,
            display_name: None,
            sender,
            room: None,
        }
    }

    /// Push an event into this connection's outbound channel
    ///
    /// Fire-and-forget from the router's perspective; the socket write
    /// happens on the connection's own write task. Returns an error if
    /// the channel is closed (client disconnected).
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender
            .try_send(event)
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Get the display name for this connection
    ///
    /// Returns "Unknown" if no name was supplied at join time, so
    /// outbound presence payloads are always a string.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let conn = Connection::new(ConnectionId::new(), tx);

        assert!(conn.display_name.is_none());
        assert!(conn.room.is_none());
        assert_eq!(conn.display_name(), "Unknown");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(32);
        let conn = Connection::new(ConnectionId::new(), tx);
        drop(rx);

        assert!(conn.send(ServerEvent::UserJoined("Bob".into())).is_err());
    }
}
