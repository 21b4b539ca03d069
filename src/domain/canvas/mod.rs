//! Canvas module - strokes, operations, and the per-room drawing engine.
//!
//! # Module Organization
//!
//! - `stroke` - Stroke records, points, and style
//! - `operation` - `Add`/`Remove` operations, the unit of replication
//! - `drawing_state` - Transient strokes plus the bounded undo/redo log
//! - `mirror` - Client-side replica rebuilt from snapshots and operations

mod drawing_state;
mod mirror;
mod operation;
mod stroke;

pub use drawing_state::{DrawingLimits, DrawingState, HistoryStep, MAX_HISTORY, MAX_STROKE_POINTS};
pub use mirror::StrokeMirror;
pub use operation::Operation;
pub use stroke::{Point, Stroke, StrokeStyle, Tool, MAX_COLOR_LENGTH};
