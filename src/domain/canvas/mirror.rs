//! Client-side replica of a room's visible canvas.
//!
//! A mirror never runs undo logic of its own: it adopts full snapshots
//! (`room:joined`, `room:state`) and replays each committed operation
//! exactly as the server broadcast it.

use indexmap::IndexMap;

use crate::domain::foundation::StrokeId;

use super::operation::Operation;
use super::stroke::Stroke;

/// Local mirror of the committed strokes of one room.
#[derive(Debug, Clone, Default)]
pub struct StrokeMirror {
    strokes: IndexMap<StrokeId, Stroke>,
    history_pointer: usize,
}

impl StrokeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirror contents with a server snapshot.
    pub fn reset(&mut self, strokes: impl IntoIterator<Item = Stroke>, history_pointer: usize) {
        self.strokes = strokes
            .into_iter()
            .map(|stroke| (stroke.id().clone(), stroke))
            .collect();
        self.history_pointer = history_pointer;
    }

    /// Replay one committed operation.
    pub fn apply(&mut self, op: &Operation, history_pointer: usize) {
        op.apply_to(&mut self.strokes);
        self.history_pointer = history_pointer;
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.values()
    }

    pub fn stroke(&self, id: &StrokeId) -> Option<&Stroke> {
        self.strokes.get(id)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Last history pointer the server reported.
    pub fn history_pointer(&self) -> usize {
        self.history_pointer
    }
}
