//! WebSocket connection handler
//!
//! Handles one client connection: WebSocket handshake, frame parsing,
//! and bidirectional plumbing between the socket and the RelayServer
//! actor.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::message::{ClientEvent, ServerEvent};
use crate::server::RelayCommand;
use crate::types::ConnectionId;

/// Per-connection outbound channel capacity
const OUTBOUND_BUFFER_SIZE: usize = 64;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers the connection with the
/// relay actor, and runs the read/write tasks until either side closes.
/// Always sends a Disconnect command on the way out so registry and
/// room cleanup happens exactly once.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<RelayCommand>,
) -> Result<(), RelayError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = ConnectionId::new();
    info!("Connection {} accepted from {}", connection_id, peer_addr);

    // Channel for server -> client events
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER_SIZE);

    // Register with the relay actor
    if cmd_tx
        .send(RelayCommand::Connect {
            connection_id,
            sender: event_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register connection {} - server closed", connection_id);
        return Err(RelayError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Read task (WebSocket frame -> RelayCommand)
    let read_task = tokio::spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            let cmd = client_event_to_command(connection_id, event);
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("Server closed, ending read task for {}", connection_id);
                                break;
                            }
                        }
                        Err(e) => {
                            // Tolerant protocol: unparseable frames are
                            // logged and dropped, never answered
                            warn!("Invalid frame from {}: {}", connection_id, e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Connection {} sent close frame", connection_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by tungstenite
                    debug!("Ping from {}", connection_id);
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", connection_id);
                }
                Ok(_) => {
                    // Binary or other frame types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", connection_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", connection_id);
    });

    // Write task (ServerEvent -> WebSocket frame)
    let write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for connection");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", connection_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", connection_id);
        }
    }

    // Disconnect triggers synchronous registry and room cleanup in
    // the actor
    let _ = cmd_tx
        .send(RelayCommand::Disconnect { connection_id })
        .await;

    info!("Connection {} closed", connection_id);

    Ok(())
}

/// Convert a ClientEvent to a RelayCommand
fn client_event_to_command(connection_id: ConnectionId, event: ClientEvent) -> RelayCommand {
    match event {
        ClientEvent::JoinGroup(join) => RelayCommand::JoinGroup {
            connection_id,
            group_name: join.group_name,
            user_name: join.user_name,
        },
        ClientEvent::SendMessage(message) => RelayCommand::SendMessage {
            connection_id,
            message,
        },
        ClientEvent::Typing => RelayCommand::Typing { connection_id },
        ClientEvent::StopTyping => RelayCommand::StopTyping { connection_id },
    }
}
