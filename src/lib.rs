//! Sketchroom - real-time collaborative drawing rooms
//!
//! Participants in a room stream strokes to each other and share one
//! undo/redo history. Each room is served by a single actor task that
//! orders every event, so all clients converge on the same canvas.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
