//! Messages flowing into and out of a room's serialization point.

use tokio::sync::{mpsc, oneshot};

use crate::domain::canvas::{Operation, Point, StrokeStyle};
use crate::domain::foundation::{ParticipantId, StrokeId};
use crate::domain::room::{RoomSnapshot, RoomSummary};

// ============================================
// Participant → Room
// ============================================

/// An event originated by one connected participant.
///
/// Already parsed and validated by the transport adapter; the coordinator
/// only decides how it affects the room.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantEvent {
    /// Pointer moved.
    Cursor {
        x: f64,
        y: f64,
        color: Option<String>,
    },

    /// Begin streaming a stroke.
    StrokeStart {
        stroke_id: StrokeId,
        style: StrokeStyle,
    },

    /// More points for a stroke being streamed.
    StrokeChunk {
        stroke_id: StrokeId,
        points: Vec<Point>,
    },

    /// Commit a streamed stroke.
    StrokeEnd { stroke_id: StrokeId },

    /// Remove a committed stroke.
    StrokeRemove { stroke_id: StrokeId },

    /// Step the shared history back.
    Undo,

    /// Step the shared history forward.
    Redo,

    /// Ask for a full snapshot (after reconnection or suspected drift).
    RequestState,

    /// Heartbeat.
    Ping,
}

// ============================================
// Room → Participant
// ============================================

/// Why an undo/redo request changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    NothingToUndo,
    NothingToRedo,
    Irreversible,
}

impl NoOpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoOpReason::NothingToUndo => "nothing-to-undo",
            NoOpReason::NothingToRedo => "nothing-to-redo",
            NoOpReason::Irreversible => "irreversible",
        }
    }
}

/// Something a room tells one of its members.
///
/// Transport adapters turn these into wire messages.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Sent once to a participant right after they join.
    Joined {
        user_id: ParticipantId,
        snapshot: RoomSnapshot,
    },

    /// Another participant joined.
    UserJoined { user_id: ParticipantId },

    /// Another participant left.
    UserLeft { user_id: ParticipantId },

    /// Another participant's pointer moved.
    Cursor {
        user_id: ParticipantId,
        x: f64,
        y: f64,
        color: Option<String>,
    },

    /// Another participant began a stroke.
    StrokeStarted {
        user_id: ParticipantId,
        stroke_id: StrokeId,
        style: StrokeStyle,
    },

    /// Points accepted into another participant's stroke.
    StrokeChunk {
        user_id: ParticipantId,
        stroke_id: StrokeId,
        points: Vec<Point>,
    },

    /// Another participant's stroke was committed.
    StrokeEnded {
        user_id: ParticipantId,
        stroke_id: StrokeId,
    },

    /// A committed operation every member must adopt, sender included.
    OperationApplied {
        op: Operation,
        history_pointer: usize,
    },

    /// Informational reply to an undo/redo that changed nothing.
    NoOp { reason: NoOpReason },

    /// Full snapshot in reply to a resync request.
    State(RoomSnapshot),

    /// Heartbeat reply.
    Pong,
}

// ============================================
// Internal queue
// ============================================

/// Work item for a room actor. Every interaction with a room goes through
/// one of these, in queue order.
#[derive(Debug)]
pub(crate) enum RoomCommand {
    Join {
        participant: ParticipantId,
        outbox: mpsc::Sender<RoomEvent>,
    },
    Event {
        participant: ParticipantId,
        event: ParticipantEvent,
    },
    Leave {
        participant: ParticipantId,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Summary {
        reply: oneshot::Sender<RoomSummary>,
    },
    Shutdown,
}
