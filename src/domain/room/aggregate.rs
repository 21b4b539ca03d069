//! Room aggregate.
//!
//! A room pairs one membership set with one drawing state for its whole
//! lifetime. Rooms never see each other's strokes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::canvas::{DrawingLimits, DrawingState, Stroke};
use crate::domain::foundation::{ParticipantId, RoomId, Timestamp};

/// Room aggregate - membership plus drawing state.
///
/// # Invariants
///
/// - `id` never changes
/// - `state` belongs to this room only
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: HashSet<ParticipantId>,
    state: DrawingState,
    created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, limits: DrawingLimits) -> Self {
        Self {
            id,
            members: HashSet::new(),
            state: DrawingState::with_limits(limits),
            created_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn members(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DrawingState {
        &mut self.state
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns `false` if the participant was already a member.
    pub fn add_member(&mut self, participant: ParticipantId) -> bool {
        self.members.insert(participant)
    }

    /// Remove a participant and discard any strokes they were still drawing.
    ///
    /// Returns `false` (and touches nothing) if they were not a member.
    pub fn remove_member(&mut self, participant: &ParticipantId) -> bool {
        if !self.members.remove(participant) {
            return false;
        }
        let discarded = self.state.cancel_transients_by_owner(participant);
        if !discarded.is_empty() {
            tracing::debug!(
                room_id = %self.id,
                user_id = %participant,
                count = discarded.len(),
                "Discarded unfinished strokes on leave"
            );
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    /// Full visible canvas plus history position.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            strokes: self.state.snapshot(),
            history_pointer: self.state.history_pointer(),
        }
    }

    /// Counters for monitoring.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            members: self.members.len(),
            strokes: self.state.stroke_count(),
            transient_strokes: self.state.transient_count(),
            history_length: self.state.history_len(),
            history_pointer: self.state.history_pointer(),
            created_at: self.created_at,
        }
    }
}

/// Everything a late joiner or resyncing client needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub strokes: Vec<Stroke>,
    pub history_pointer: usize,
}

/// Room counters exposed on the monitoring endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub members: usize,
    pub strokes: usize,
    pub transient_strokes: usize,
    pub history_length: usize,
    pub history_pointer: usize,
    pub created_at: Timestamp,
}
