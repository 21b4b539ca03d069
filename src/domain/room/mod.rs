//! Room module - an isolated collaboration session.

mod aggregate;

pub use aggregate::{Room, RoomSnapshot, RoomSummary};
