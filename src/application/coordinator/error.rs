//! Coordinator error types.

use thiserror::Error;

use crate::domain::foundation::RoomId;

/// Errors from the room registry and room handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room already exists: {0}")]
    AlreadyExists(RoomId),

    #[error("Room is closed: {0}")]
    Closed(RoomId),
}
