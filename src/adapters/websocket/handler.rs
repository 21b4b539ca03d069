//! WebSocket upgrade handler for live drawing connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Validate the room id
//! 2. Upgrade to WebSocket
//! 3. Join the room (creating it on first use)
//! 4. Relay client frames into the room and room events back to the client
//! 5. Leave the room exactly once

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{stream::SplitSink, SinkExt, StreamExt};

use crate::application::coordinator::RoomManager;
use crate::domain::foundation::RoomId;

use super::messages::{ClientMessage, ServerMessage};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    /// Registry of live rooms.
    pub room_manager: Arc<RoomManager>,

    /// Room served on the bare `/ws` route.
    pub default_room: RoomId,
}

impl WebSocketState {
    pub fn new(room_manager: Arc<RoomManager>, default_room: RoomId) -> Self {
        Self {
            room_manager,
            default_room,
        }
    }
}

/// Handle WebSocket upgrade requests for a named room.
///
/// Route: `GET /api/rooms/:room_id/live`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(state): State<WebSocketState>,
) -> Response {
    let room_id: RoomId = match room_id.parse() {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting WebSocket upgrade");
            return (StatusCode::BAD_REQUEST, "Invalid room ID").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, room_id, state))
}

/// Handle WebSocket upgrade requests for the default room.
///
/// Route: `GET /ws`
pub async fn default_room_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebSocketState>,
) -> Response {
    let room_id = state.default_room.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, room_id, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. The reader forwards frames to
/// the room strictly in receive order and only then queues the leave, so
/// the last event a client sent is processed before its disconnect.
async fn handle_socket(socket: WebSocket, room_id: RoomId, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let room = state.room_manager.get_or_create(room_id.clone()).await;
    let outbox_capacity = state.room_manager.settings().outbox_capacity;
    let (session, mut events) = match room.join(outbox_capacity).await {
        Ok(joined) => joined,
        Err(e) => {
            tracing::warn!(room_id = %room_id, error = %e, "Failed to join room");
            return;
        }
    };
    let user_id = session.participant_id();
    tracing::debug!(room_id = %room_id, user_id = %user_id, "WebSocket connected");

    // Forward room events to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = send_message(&mut sender, ServerMessage::from(event)).await {
                tracing::debug!(user_id = %user_id, "Send error, closing connection: {}", e);
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Forward client frames to the room
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let event = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => msg.into_event(),
                        Err(e) => {
                            tracing::debug!(user_id = %user_id, "Ignoring unparseable frame: {}", e);
                            continue;
                        }
                    };
                    match event {
                        Ok(event) => {
                            if let Err(e) = session.send(event).await {
                                tracing::debug!(user_id = %user_id, "Room unavailable: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(user_id = %user_id, "Ignoring invalid event: {}", e);
                        }
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(user_id = %user_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level heartbeats are answered by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(user_id = %user_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(user_id = %user_id, "Receive error: {}", e);
                    break;
                }
            }
        }

        session
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => {
            // Aborting drops the session, which queues the leave
            recv_task.abort();
        }
        result = &mut recv_task => {
            send_task.abort();
            if let Ok(session) = result {
                session.leave().await;
            }
        }
    }

    tracing::debug!(room_id = %room_id, user_id = %user_id, "WebSocket disconnected");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(&msg) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::warn!("Failed to serialize server message: {}", e);
            Ok(())
        }
    }
}

/// Create axum router for the WebSocket endpoints.
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new()
        .route("/api/rooms/:room_id/live", get(ws_handler))
        .route("/ws", get(default_room_handler))
}
