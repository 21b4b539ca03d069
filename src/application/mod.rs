//! Application layer - room coordination on top of the drawing domain.
//!
//! Decides the order in which participant events reach a room and who
//! hears about the result.

pub mod coordinator;

pub use coordinator::{
    NoOpReason, ParticipantEvent, ParticipantSession, RoomError, RoomEvent, RoomHandle,
    RoomManager, RoomSettings,
};
