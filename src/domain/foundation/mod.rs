//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the drawing-room domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ParticipantId, RoomId, StrokeId, MAX_ROOM_ID_LENGTH, MAX_STROKE_ID_LENGTH};
pub use timestamp::Timestamp;
