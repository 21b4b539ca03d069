//! Operations: the unit of replication for the visible stroke set.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::StrokeId;

use super::stroke::Stroke;

/// A committed, invertible change to the visible stroke set.
///
/// # Invariants
///
/// Every `Remove` recorded for a stroke that was visible carries
/// `removed_stroke`, which makes the operation self-invertible without
/// re-deriving prior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    /// Stroke entered the visible set.
    Add { stroke: Stroke },

    /// Stroke left the visible set.
    #[serde(rename_all = "camelCase")]
    Remove {
        stroke_id: StrokeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        removed_stroke: Option<Stroke>,
    },
}

impl Operation {
    pub fn add(stroke: Stroke) -> Self {
        Operation::Add { stroke }
    }

    /// A `Remove` whose content will be captured when it is pushed.
    pub fn remove(stroke_id: StrokeId) -> Self {
        Operation::Remove {
            stroke_id,
            removed_stroke: None,
        }
    }

    /// The stroke this operation refers to.
    pub fn stroke_id(&self) -> &StrokeId {
        match self {
            Operation::Add { stroke } => stroke.id(),
            Operation::Remove { stroke_id, .. } => stroke_id,
        }
    }

    /// The operation that undoes this one.
    ///
    /// Returns `None` for a `Remove` that never captured its stroke: there is
    /// nothing to restore.
    pub fn inverse(&self) -> Option<Operation> {
        match self {
            Operation::Add { stroke } => Some(Operation::Remove {
                stroke_id: stroke.id().clone(),
                removed_stroke: Some(stroke.clone()),
            }),
            Operation::Remove {
                removed_stroke: Some(stroke),
                ..
            } => Some(Operation::Add {
                stroke: stroke.clone(),
            }),
            Operation::Remove {
                removed_stroke: None,
                ..
            } => None,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Operation::Add { .. })
    }

    /// Apply this operation directly to a stroke set, without any history.
    ///
    /// `Add` inserts (or replaces in place), `Remove` deletes while keeping
    /// the relative order of the remaining strokes. Returns whether the set
    /// changed membership.
    pub fn apply_to(&self, strokes: &mut IndexMap<StrokeId, Stroke>) -> bool {
        match self {
            Operation::Add { stroke } => strokes
                .insert(stroke.id().clone(), stroke.clone())
                .is_none(),
            Operation::Remove { stroke_id, .. } => {
                let removed = strokes.shift_remove(stroke_id).is_some();
                if !removed {
                    tracing::debug!(stroke_id = %stroke_id, "Remove for a stroke that is not visible");
                }
                removed
            }
        }
    }
}
