//! Domain layer containing the drawing engine and room types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `canvas` - Strokes, operations, and the undo/redo drawing engine
//! - `room` - Room aggregate pairing membership with one drawing state

pub mod canvas;
pub mod foundation;
pub mod room;
