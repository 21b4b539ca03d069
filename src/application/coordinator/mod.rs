//! Session coordinator - one serialization point per room.
//!
//! # Flow
//!
//! ```text
//! connection ─ParticipantEvent─▶ RoomHandle ─▶ [queue] ─▶ RoomActor
//!                                                          │
//!            ◀──────RoomEvent────── outbox ◀───────────────┘
//! ```
//!
//! Transport adapters translate wire frames into [`ParticipantEvent`]s and
//! [`RoomEvent`]s back into wire frames; nothing here knows about sockets.

mod actor;
mod commands;
mod error;
mod handle;
mod manager;

pub use commands::{NoOpReason, ParticipantEvent, RoomEvent};
pub use error::RoomError;
pub use handle::{ParticipantSession, RoomHandle};
pub use manager::{
    RoomManager, RoomSettings, DEFAULT_OUTBOX_CAPACITY, DEFAULT_ROOM_QUEUE_CAPACITY,
};
