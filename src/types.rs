//! Basic type definitions for the relay
//!
//! Provides newtype wrappers for type safety:
//! - `ConnectionId`: UUID-based unique connection identifier
//! - `RoomName`: client-supplied room name (case-sensitive)

use uuid::Uuid;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 assigned at accept time.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name (arbitrary client-supplied string, case-sensitive)
///
/// There is no registration step: the first join under a name
/// implicitly creates the room. Names are compared exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(pub String);

impl RoomName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
