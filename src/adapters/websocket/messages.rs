//! WebSocket message types for live drawing rooms.
//!
//! Defines the JSON protocol between server and connected clients:
//! - Client → Server: cursor moves, stroke streaming, undo/redo, resync, pings
//! - Server → Client: room snapshots, presence, stroke relays, committed ops

use serde::{Deserialize, Serialize};

use crate::application::coordinator::{ParticipantEvent, RoomEvent};
use crate::domain::canvas::{Operation, Point, Stroke, StrokeStyle, Tool};
use crate::domain::foundation::{ParticipantId, RoomId, StrokeId, Timestamp, ValidationError};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Joined a room; carries the full current canvas.
    #[serde(rename = "room:joined", rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        user_id: ParticipantId,
        strokes: Vec<Stroke>,
        history_pointer: usize,
    },

    /// Another participant joined.
    #[serde(rename = "user:join", rename_all = "camelCase")]
    UserJoin { user_id: ParticipantId },

    /// Another participant left.
    #[serde(rename = "user:left", rename_all = "camelCase")]
    UserLeft { user_id: ParticipantId },

    /// Another participant's pointer.
    #[serde(rename = "cursor", rename_all = "camelCase")]
    Cursor {
        user_id: ParticipantId,
        x: f64,
        y: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },

    /// Another participant started a stroke.
    #[serde(rename = "stroke:start", rename_all = "camelCase")]
    StrokeStart {
        stroke_id: StrokeId,
        user_id: ParticipantId,
        #[serde(flatten)]
        style: StrokeStyle,
    },

    /// Points accepted into another participant's stroke.
    #[serde(rename = "stroke:chunk", rename_all = "camelCase")]
    StrokeChunk {
        stroke_id: StrokeId,
        user_id: ParticipantId,
        points: Vec<Point>,
    },

    /// Another participant's stroke was committed.
    #[serde(rename = "stroke:end", rename_all = "camelCase")]
    StrokeEnd {
        stroke_id: StrokeId,
        user_id: ParticipantId,
    },

    /// Committed operation every client applies to its canvas.
    #[serde(rename = "apply_op", rename_all = "camelCase")]
    ApplyOp { op: Operation, history_pointer: usize },

    /// Undo/redo request changed nothing.
    #[serde(rename = "no-op")]
    NoOp { reason: String },

    /// Full canvas in reply to `request:state`.
    #[serde(rename = "room:state", rename_all = "camelCase")]
    RoomState {
        room_id: RoomId,
        strokes: Vec<Stroke>,
        history_pointer: usize,
    },

    /// Heartbeat response.
    #[serde(rename = "pong")]
    Pong { timestamp: String },
}

impl From<RoomEvent> for ServerMessage {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Joined { user_id, snapshot } => ServerMessage::RoomJoined {
                room_id: snapshot.room_id,
                user_id,
                strokes: snapshot.strokes,
                history_pointer: snapshot.history_pointer,
            },
            RoomEvent::UserJoined { user_id } => ServerMessage::UserJoin { user_id },
            RoomEvent::UserLeft { user_id } => ServerMessage::UserLeft { user_id },
            RoomEvent::Cursor {
                user_id,
                x,
                y,
                color,
            } => ServerMessage::Cursor {
                user_id,
                x,
                y,
                color,
            },
            RoomEvent::StrokeStarted {
                user_id,
                stroke_id,
                style,
            } => ServerMessage::StrokeStart {
                stroke_id,
                user_id,
                style,
            },
            RoomEvent::StrokeChunk {
                user_id,
                stroke_id,
                points,
            } => ServerMessage::StrokeChunk {
                stroke_id,
                user_id,
                points,
            },
            RoomEvent::StrokeEnded { user_id, stroke_id } => {
                ServerMessage::StrokeEnd { stroke_id, user_id }
            }
            RoomEvent::OperationApplied {
                op,
                history_pointer,
            } => ServerMessage::ApplyOp {
                op,
                history_pointer,
            },
            RoomEvent::NoOp { reason } => ServerMessage::NoOp {
                reason: reason.as_str().to_string(),
            },
            RoomEvent::State(snapshot) => ServerMessage::RoomState {
                room_id: snapshot.room_id,
                strokes: snapshot.strokes,
                history_pointer: snapshot.history_pointer,
            },
            RoomEvent::Pong => ServerMessage::Pong {
                timestamp: Timestamp::now().to_rfc3339(),
            },
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from a client.
///
/// Unknown fields (such as a client-supplied `userId`) are ignored; the
/// server always attributes events to the connection that sent them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "cursor")]
    Cursor {
        x: f64,
        y: f64,
        #[serde(default)]
        color: Option<String>,
    },

    #[serde(rename = "stroke:start", rename_all = "camelCase")]
    StrokeStart {
        stroke_id: StrokeId,
        color: String,
        width: f64,
        #[serde(default)]
        tool: Tool,
    },

    #[serde(rename = "stroke:chunk", rename_all = "camelCase")]
    StrokeChunk {
        stroke_id: StrokeId,
        #[serde(default)]
        points: Vec<Point>,
    },

    #[serde(rename = "stroke:end", rename_all = "camelCase")]
    StrokeEnd { stroke_id: StrokeId },

    #[serde(rename = "stroke:remove", rename_all = "camelCase")]
    StrokeRemove { stroke_id: StrokeId },

    #[serde(rename = "undo")]
    Undo,

    #[serde(rename = "redo")]
    Redo,

    /// Request the full canvas (after reconnection or suspected drift).
    #[serde(rename = "request:state")]
    RequestState,

    /// Heartbeat request.
    #[serde(rename = "ping")]
    Ping,
}

impl ClientMessage {
    /// Validate the payload and convert it into a room event.
    pub fn into_event(self) -> Result<ParticipantEvent, ValidationError> {
        let event = match self {
            ClientMessage::Cursor { x, y, color } => ParticipantEvent::Cursor { x, y, color },
            ClientMessage::StrokeStart {
                stroke_id,
                color,
                width,
                tool,
            } => ParticipantEvent::StrokeStart {
                stroke_id,
                style: StrokeStyle::new(color, width, tool)?,
            },
            ClientMessage::StrokeChunk { stroke_id, points } => {
                ParticipantEvent::StrokeChunk { stroke_id, points }
            }
            ClientMessage::StrokeEnd { stroke_id } => ParticipantEvent::StrokeEnd { stroke_id },
            ClientMessage::StrokeRemove { stroke_id } => {
                ParticipantEvent::StrokeRemove { stroke_id }
            }
            ClientMessage::Undo => ParticipantEvent::Undo,
            ClientMessage::Redo => ParticipantEvent::Redo,
            ClientMessage::RequestState => ParticipantEvent::RequestState,
            ClientMessage::Ping => ParticipantEvent::Ping,
        };
        Ok(event)
    }
}
