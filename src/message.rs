//! Wire protocol definitions
//!
//! JSON-based bidirectional event protocol using Serde's adjacently
//! tagged enums: frames look like `{"event": "...", "data": ...}` with
//! `data` omitted for payload-less events.

use serde::{Deserialize, Serialize};

/// Client → Server event
///
/// All events a client may send. Payload-less events (`typing`,
/// `stop_typing`) are unit variants.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join a named group, implicitly creating it on first use
    JoinGroup(JoinGroup),
    /// Relay a chat message to the sender's current group
    SendMessage(ChatMessage),
    /// Sender started typing
    Typing,
    /// Sender stopped typing
    StopTyping,
}

/// Server → Client event
///
/// Everything the relay fans out to group members. The protocol
/// defines no error event; misuse is dropped server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Another member joined the group (payload: display name)
    UserJoined(String),
    /// Chat message from another member, relayed unmodified
    ReceiveMessage(ChatMessage),
    /// Another member is typing (payload: display name)
    UserTyping(String),
    /// Another member stopped typing (payload: display name)
    UserStopTyping(String),
}

/// `join_group` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroup {
    /// Target group name, case-sensitive
    pub group_name: String,
    /// Display name announced to other members; may be null
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Chat message payload, relayed opaquely
///
/// The relay never validates, stores, or rewrites any field; the
/// `receive_message` fan-out carries exactly what `send_message` sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: String,
    /// Epoch milliseconds, as produced by the sending client
    pub timestamp: i64,
}
