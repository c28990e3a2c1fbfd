//! Group-Chat Relay Server Library
//!
//! A WebSocket relay for named group chat built with tokio-tungstenite
//! using the Actor pattern for state management. Clients join named
//! rooms, exchange opaque text messages, and observe presence signals
//! (join notifications, typing indicators) scoped to their room.
//!
//! # Features
//! - WebSocket connection handling
//! - Implicit room creation on first join
//! - Room-scoped broadcast with sender exclusion
//! - Typing indicators (stateless passthrough)
//! - Disconnection cleanup
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the connection registry
//!   and the room membership index
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use group_relay::{RelayServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod rooms;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use connection::Connection;
pub use error::{RelayError, SendError};
pub use handler::handle_connection;
pub use message::{ChatMessage, ClientEvent, JoinGroup, ServerEvent};
pub use registry::ConnectionRegistry;
pub use rooms::RoomIndex;
pub use server::{RelayCommand, RelayServer};
pub use types::{ConnectionId, RoomName};
