//! WebSocket adapter for live drawing rooms.
//!
//! # Architecture
//!
//! ```text
//!  client ──JSON──▶ recv task ──ParticipantEvent──▶ RoomHandle ─▶ RoomActor
//!  client ◀─JSON─── send task ◀──RoomEvent──────── outbox ◀──────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler and connection loop

pub mod handler;
pub mod messages;

pub use handler::{default_room_handler, websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
