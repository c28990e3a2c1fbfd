//! RelayServer actor implementation
//!
//! The central actor owning all shared state: the Connection Registry
//! and the Room Membership Index. Handlers never touch that state
//! directly; they send `RelayCommand` values over an mpsc channel and
//! the actor processes them one at a time, so every mutation is
//! serialized without locks.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::{ChatMessage, ServerEvent};
use crate::registry::ConnectionRegistry;
use crate::rooms::RoomIndex;
use crate::types::{ConnectionId, RoomName};

/// Commands sent from connection handlers to the RelayServer actor
#[derive(Debug)]
pub enum RelayCommand {
    /// New connection accepted
    Connect {
        connection_id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// Transport closed
    Disconnect {
        connection_id: ConnectionId,
    },
    /// Join a named group
    JoinGroup {
        connection_id: ConnectionId,
        group_name: String,
        user_name: Option<String>,
    },
    /// Relay a chat message to the sender's group
    SendMessage {
        connection_id: ConnectionId,
        message: ChatMessage,
    },
    /// Sender started typing
    Typing {
        connection_id: ConnectionId,
    },
    /// Sender stopped typing
    StopTyping {
        connection_id: ConnectionId,
    },
}

/// The main relay actor
///
/// Routes each inbound event against current membership and fans out
/// to every other member of the sender's room. Sender exclusion is
/// structural: the broadcast helper always skips the originator.
pub struct RelayServer {
    /// Live connections
    registry: ConnectionRegistry,
    /// Room name → member set, maintained on join/disconnect
    rooms: RoomIndex,
    /// Command receiver channel
    receiver: mpsc::Receiver<RelayCommand>,
}

impl RelayServer {
    /// Create a new RelayServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<RelayCommand>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomIndex::new(),
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { connection_id, sender } => {
                self.handle_connect(connection_id, sender);
            }
            RelayCommand::Disconnect { connection_id } => {
                self.handle_disconnect(connection_id);
            }
            RelayCommand::JoinGroup {
                connection_id,
                group_name,
                user_name,
            } => {
                self.handle_join_group(connection_id, group_name, user_name);
            }
            RelayCommand::SendMessage { connection_id, message } => {
                self.handle_send_message(connection_id, message);
            }
            RelayCommand::Typing { connection_id } => {
                self.handle_typing(connection_id);
            }
            RelayCommand::StopTyping { connection_id } => {
                self.handle_stop_typing(connection_id);
            }
        }
    }

    /// Handle new connection
    fn handle_connect(&mut self, connection_id: ConnectionId, sender: mpsc::Sender<ServerEvent>) {
        info!("Connection {} registered", connection_id);
        self.registry.register(connection_id, sender);
        debug!(
            "Total connections: {}, active rooms: {}",
            self.registry.len(),
            self.rooms.room_count()
        );
    }

    /// Handle disconnection
    ///
    /// Cleanup is synchronous: once this returns, no membership read
    /// can observe the departed connection. No leave notification is
    /// emitted; only joins are announced in this protocol.
    fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        let Some(conn) = self.registry.deregister(connection_id) else {
            return;
        };

        if let Some(room) = &conn.room {
            self.rooms.leave(room, connection_id);
        }

        info!("Connection {} deregistered", connection_id);
        debug!(
            "Total connections: {}, active rooms: {}",
            self.registry.len(),
            self.rooms.room_count()
        );
    }

    /// Handle group join
    ///
    /// First join under a name implicitly creates the room. A second
    /// join from the same connection switches rooms: membership in the
    /// previous room is dropped silently before joining the new one.
    /// The join is announced to every other member, never to the
    /// joiner itself.
    fn handle_join_group(
        &mut self,
        connection_id: ConnectionId,
        group_name: String,
        user_name: Option<String>,
    ) {
        let Some(conn) = self.registry.get_mut(connection_id) else {
            return;
        };

        let room = RoomName::new(group_name);

        if let Some(name) = user_name {
            conn.display_name = Some(name);
        }

        if let Some(previous) = conn.room.take() {
            if previous != room {
                self.rooms.leave(&previous, connection_id);
            }
        }

        conn.room = Some(room.clone());
        let display_name = conn.display_name().to_string();

        self.rooms.join(room.clone(), connection_id);

        info!("Connection {} joined room '{}'", connection_id, room);

        self.broadcast_to_room(&room, connection_id, ServerEvent::UserJoined(display_name));
    }

    /// Handle chat message relay
    ///
    /// The payload passes through unmodified. A connection with no
    /// current room is dropped silently; the protocol tolerates
    /// misuse rather than surfacing errors.
    fn handle_send_message(&mut self, connection_id: ConnectionId, message: ChatMessage) {
        let Some(room) = self.current_room(connection_id) else {
            debug!("Dropping message from roomless connection {}", connection_id);
            return;
        };

        self.broadcast_to_room(&room, connection_id, ServerEvent::ReceiveMessage(message));
    }

    /// Handle typing indicator start
    ///
    /// Stateless passthrough: no server-side timer or deduplication,
    /// the sending client owns the debounce.
    fn handle_typing(&mut self, connection_id: ConnectionId) {
        let Some((room, name)) = self.current_room_and_name(connection_id) else {
            debug!("Dropping typing from roomless connection {}", connection_id);
            return;
        };

        self.broadcast_to_room(&room, connection_id, ServerEvent::UserTyping(name));
    }

    /// Handle typing indicator stop
    fn handle_stop_typing(&mut self, connection_id: ConnectionId) {
        let Some((room, name)) = self.current_room_and_name(connection_id) else {
            debug!("Dropping stop_typing from roomless connection {}", connection_id);
            return;
        };

        self.broadcast_to_room(&room, connection_id, ServerEvent::UserStopTyping(name));
    }

    /// Helper: the sender's current room, if any
    fn current_room(&self, connection_id: ConnectionId) -> Option<RoomName> {
        self.registry.get(connection_id).and_then(|c| c.room.clone())
    }

    /// Helper: current room plus display name, for presence events
    fn current_room_and_name(&self, connection_id: ConnectionId) -> Option<(RoomName, String)> {
        let conn = self.registry.get(connection_id)?;
        let room = conn.room.clone()?;
        Some((room, conn.display_name().to_string()))
    }

    /// Deliver an event to every current member of a room except the
    /// originator
    ///
    /// Membership is read once, then iterated. Each delivery is
    /// independent: an unreachable recipient is skipped and never
    /// aborts delivery to the rest.
    fn broadcast_to_room(&self, room: &RoomName, except: ConnectionId, event: ServerEvent) {
        for member_id in self.rooms.members(room) {
            if member_id == except {
                continue;
            }
            let Some(member) = self.registry.get(member_id) else {
                continue;
            };
            if member.send(event.clone()).is_err() {
                debug!("Skipping unreachable member {} in '{}'", member_id, room);
            }
        }
    }
}
