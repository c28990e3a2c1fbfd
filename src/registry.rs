//! Connection Registry
//!
//! Exclusive owner of the set of live connections. Created on accept,
//! removed on disconnect; lookups by `ConnectionId`.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::connection::Connection;
use crate::message::ServerEvent;
use crate::types::ConnectionId;

/// Registry of live connections, keyed by `ConnectionId`
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Register a new connection with no room and no display name
    pub fn register(&mut self, id: ConnectionId, sender: mpsc::Sender<ServerEvent>) {
        self.connections.insert(id, Connection::new(id, sender));
    }

    /// Remove a connection, returning its record for room cleanup
    ///
    /// Idempotent: deregistering an unknown id returns None and is not
    /// an error.
    pub fn deregister(&mut self, id: ConnectionId) -> Option<Connection> {
        self.connections.remove(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> mpsc::Sender<ServerEvent> {
        let (tx, _rx) = mpsc::channel(32);
        tx
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();

        registry.register(id, probe());

        let conn = registry.get(id).unwrap();
        assert_eq!(conn.id, id);
        assert!(conn.room.is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_deregister_removes() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.register(id, probe());

        let removed = registry.deregister(id);
        assert!(removed.is_some());
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.deregister(ConnectionId::new()).is_none());
    }
}
