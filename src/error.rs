//! Error types for the relay
//!
//! Covers transport-level faults owned by the connection handler.
//! Uses thiserror for ergonomic error definitions.
//!
//! The relay protocol itself defines no error event: protocol misuse
//! (e.g. sending a message without a room) is dropped silently, never
//! surfaced across the wire. Errors here only ever terminate a single
//! connection, never the server.

use thiserror::Error;

/// Transport-level errors for a single connection
#[derive(Debug, Error)]
pub enum RelayError {
    /// WebSocket protocol error (fatal for the connection)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal for the connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Command channel send error (server actor gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Outbound delivery errors
///
/// Occurs when pushing an event into a disconnected client's channel.
/// One unreachable recipient never aborts delivery to the rest.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
