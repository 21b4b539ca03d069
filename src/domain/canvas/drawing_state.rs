//! Per-room drawing engine.
//!
//! Owns the visible canvas (finalized strokes), the transient strokes still
//! being streamed by their owners, and a bounded linear undo/redo log.
//! Pure state machine: no networking, no async.
//!
//! # Stroke lifecycle
//!
//! ```text
//! nonexistent ──start──▶ transient ──finalize──▶ finalized ──remove──▶ removed
//!                            │                                          │
//!                            └──discard──▶ (gone, no history)   undo/redo only
//! ```
//!
//! # History
//!
//! `history[..history_pointer]` is applied, `history[history_pointer..]` is
//! the redo tail. Pushing a new operation truncates the tail. Undo rewinds
//! the pointer and applies the inverse; it never appends.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;

use crate::domain::foundation::{ParticipantId, StrokeId};

use super::operation::Operation;
use super::stroke::{Point, Stroke, StrokeStyle};

/// Default bound on retained history entries.
pub const MAX_HISTORY: usize = 2000;

/// Default bound on points accepted into a single stroke.
pub const MAX_STROKE_POINTS: usize = 10_000;

/// Memory bounds for one room's drawing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingLimits {
    pub max_history: usize,
    pub max_stroke_points: usize,
}

impl Default for DrawingLimits {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            max_stroke_points: MAX_STROKE_POINTS,
        }
    }
}

/// Result of an undo or redo request.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryStep {
    /// The pointer moved and this operation was applied to the canvas.
    Applied(Operation),

    /// The pointer moved past an entry that cannot be inverted; the canvas
    /// is unchanged.
    Irreversible,

    /// Nothing to undo (pointer at 0) or redo (pointer at end).
    Exhausted,
}

/// The drawing engine for one room.
///
/// # Invariants
///
/// - `history_pointer <= history.len() <= limits.max_history`
/// - a stroke id in `transient` is never in `strokes`
/// - `history_refs` counts, per stroke id, the retained entries naming it
/// - `strokes` equals the canvas at the oldest retained entry with
///   `history[..history_pointer]` replayed onto it
#[derive(Debug, Clone)]
pub struct DrawingState {
    strokes: IndexMap<StrokeId, Stroke>,
    transient: HashMap<StrokeId, Stroke>,
    history: VecDeque<Operation>,
    history_refs: HashMap<StrokeId, usize>,
    history_pointer: usize,
    limits: DrawingLimits,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::with_limits(DrawingLimits::default())
    }

    /// Create an engine with custom bounds. A history bound of zero is
    /// raised to one so the latest operation can always be recorded.
    pub fn with_limits(limits: DrawingLimits) -> Self {
        let limits = DrawingLimits {
            max_history: limits.max_history.max(1),
            ..limits
        };
        Self {
            strokes: IndexMap::new(),
            transient: HashMap::new(),
            history: VecDeque::new(),
            history_refs: HashMap::new(),
            history_pointer: 0,
            limits,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn limits(&self) -> DrawingLimits {
        self.limits
    }

    /// Finalized strokes in render order.
    pub fn visible_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.values()
    }

    /// Owned copy of the visible canvas, for snapshots.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.strokes.values().cloned().collect()
    }

    pub fn stroke(&self, id: &StrokeId) -> Option<&Stroke> {
        self.strokes.get(id)
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_transient(&self, id: &StrokeId) -> bool {
        self.transient.contains_key(id)
    }

    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }

    /// Owner of an in-progress stroke.
    pub fn transient_owner(&self, id: &StrokeId) -> Option<&ParticipantId> {
        self.transient.get(id).map(Stroke::owner)
    }

    pub fn history(&self) -> impl Iterator<Item = &Operation> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_pointer(&self) -> usize {
        self.history_pointer
    }

    pub fn can_undo(&self) -> bool {
        self.history_pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history_pointer < self.history.len()
    }

    /// Rebuild the canvas by replaying the applied part of the retained
    /// history onto `base`.
    pub fn replay_applied(&self, base: IndexMap<StrokeId, Stroke>) -> IndexMap<StrokeId, Stroke> {
        self.history
            .iter()
            .take(self.history_pointer)
            .fold(base, |mut strokes, op| {
                op.apply_to(&mut strokes);
                strokes
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transient strokes
    // ─────────────────────────────────────────────────────────────────────────

    /// Begin streaming a new stroke.
    ///
    /// Returns `false` and changes nothing if the id is already transient,
    /// visible, or referenced by retained history. A duplicate start never
    /// overwrites points that were already streamed.
    pub fn start(&mut self, id: StrokeId, owner: ParticipantId, style: StrokeStyle) -> bool {
        if self.is_known(&id) {
            tracing::debug!(stroke_id = %id, "Ignoring start for an id already in use");
            return false;
        }
        let stroke = Stroke::new(id.clone(), owner, style);
        self.transient.insert(id, stroke);
        true
    }

    /// Append points to a transient stroke, in arrival order.
    ///
    /// Returns the points actually appended, or `None` if the stroke is not
    /// transient (never started, already finalized, or discarded). Non-finite
    /// points and points beyond the per-stroke bound are dropped.
    pub fn append_points(
        &mut self,
        id: &StrokeId,
        points: impl IntoIterator<Item = Point>,
    ) -> Option<&[Point]> {
        let limit = self.limits.max_stroke_points;
        let stroke = self.transient.get_mut(id)?;
        Some(stroke.append_points(points, limit))
    }

    /// Commit a transient stroke to the canvas.
    ///
    /// Moves the stroke out of `transient` and records its `Add` through
    /// [`push_op`](Self::push_op) in the same call. Returns the recorded
    /// operation, or `None` if the id was not transient.
    pub fn finalize(&mut self, id: &StrokeId) -> Option<Operation> {
        let stroke = self.transient.remove(id)?;
        let op = Operation::add(stroke);
        self.push_op(op.clone()).then_some(op)
    }

    /// Drop a transient stroke without leaving any trace in history.
    pub fn discard(&mut self, id: &StrokeId) -> bool {
        self.transient.remove(id).is_some()
    }

    /// Discard every transient stroke owned by `owner`.
    ///
    /// Returns the ids that were discarded.
    pub fn cancel_transients_by_owner(&mut self, owner: &ParticipantId) -> Vec<StrokeId> {
        let ids: Vec<StrokeId> = self
            .transient
            .iter()
            .filter(|(_, stroke)| stroke.owner() == owner)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &ids {
            self.transient.remove(id);
        }
        ids
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operation log
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove a visible stroke by recording a `Remove` that carries it.
    ///
    /// Returns `None` and records nothing if the stroke is not visible.
    pub fn remove(&mut self, id: &StrokeId) -> Option<Operation> {
        let stroke = self.strokes.get(id)?.clone();
        let op = Operation::Remove {
            stroke_id: id.clone(),
            removed_stroke: Some(stroke),
        };
        self.push_op(op.clone());
        Some(op)
    }

    /// Record and apply an operation.
    ///
    /// An `Add` for an id that is already visible or transient is ignored
    /// and `false` is returned. A `Remove` always carries the stroke as it is
    /// currently visible, or nothing if it is not visible. Any redo tail is
    /// discarded. When the log exceeds its bound the oldest entries are
    /// forgotten; the visible canvas is not affected.
    pub fn push_op(&mut self, mut op: Operation) -> bool {
        match &mut op {
            Operation::Add { stroke } => {
                let id = stroke.id();
                if self.strokes.contains_key(id) || self.transient.contains_key(id) {
                    tracing::debug!(stroke_id = %id, "Ignoring add for a stroke already in use");
                    return false;
                }
            }
            Operation::Remove {
                stroke_id,
                removed_stroke,
            } => {
                *removed_stroke = self.strokes.get(&*stroke_id).cloned();
            }
        }

        let tail: Vec<Operation> = self.history.drain(self.history_pointer..).collect();
        for dropped in &tail {
            self.release(dropped.stroke_id());
        }

        op.apply_to(&mut self.strokes);
        *self.history_refs.entry(op.stroke_id().clone()).or_insert(0) += 1;
        self.history.push_back(op);
        self.history_pointer += 1;

        while self.history.len() > self.limits.max_history {
            if let Some(pruned) = self.history.pop_front() {
                self.release(pruned.stroke_id());
            }
            self.history_pointer = self.history_pointer.saturating_sub(1);
        }
        true
    }

    /// Step the pointer back one entry, applying its inverse.
    pub fn undo(&mut self) -> HistoryStep {
        if self.history_pointer == 0 {
            return HistoryStep::Exhausted;
        }
        let entry = &self.history[self.history_pointer - 1];
        let inverse = entry.inverse();
        self.history_pointer -= 1;

        match inverse {
            Some(inverse) => {
                inverse.apply_to(&mut self.strokes);
                HistoryStep::Applied(inverse)
            }
            None => {
                tracing::warn!(
                    stroke_id = %entry.stroke_id(),
                    "History entry has no recorded stroke; undo skips it"
                );
                HistoryStep::Irreversible
            }
        }
    }

    /// Re-apply the next entry of the redo tail.
    pub fn redo(&mut self) -> HistoryStep {
        let Some(op) = self.history.get(self.history_pointer).cloned() else {
            return HistoryStep::Exhausted;
        };
        op.apply_to(&mut self.strokes);
        self.history_pointer += 1;
        HistoryStep::Applied(op)
    }

    fn is_known(&self, id: &StrokeId) -> bool {
        self.transient.contains_key(id)
            || self.strokes.contains_key(id)
            || self.history_refs.contains_key(id)
    }

    fn release(&mut self, id: &StrokeId) {
        if let Some(count) = self.history_refs.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.history_refs.remove(id);
            }
        }
    }
}

impl Default for DrawingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canvas::stroke::Tool;

    fn sid(s: &str) -> StrokeId {
        StrokeId::new(s).unwrap()
    }

    fn red_brush() -> StrokeStyle {
        StrokeStyle::new("red", 3.0, Tool::Brush).unwrap()
    }

    fn pts(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, i as f64 * 2.0)).collect()
    }

    fn draw(state: &mut DrawingState, id: &str, owner: ParticipantId) -> Operation {
        assert!(state.start(sid(id), owner, red_brush()));
        state.append_points(&sid(id), pts(2));
        state.finalize(&sid(id)).expect("stroke was transient")
    }

    fn visible_ids(state: &DrawingState) -> Vec<String> {
        state
            .visible_strokes()
            .map(|s| s.id().as_str().to_string())
            .collect()
    }

    #[test]
    fn new_state_is_empty() {
        let state = DrawingState::new();
        assert_eq!(state.stroke_count(), 0);
        assert_eq!(state.history_len(), 0);
        assert_eq!(state.history_pointer(), 0);
        assert!(!state.can_undo());
        assert!(!state.can_redo());
    }

    #[test]
    fn draw_undo_redo_scenario() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();

        assert!(state.start(sid("s1"), owner, red_brush()));
        state.append_points(&sid("s1"), pts(3));
        let op = state.finalize(&sid("s1")).unwrap();
        assert!(op.is_add());

        assert_eq!(state.stroke(&sid("s1")).unwrap().points(), pts(3).as_slice());
        assert_eq!(state.history_pointer(), 1);

        assert!(matches!(state.undo(), HistoryStep::Applied(Operation::Remove { .. })));
        assert_eq!(state.stroke_count(), 0);
        assert_eq!(state.history_pointer(), 0);

        assert!(matches!(state.redo(), HistoryStep::Applied(Operation::Add { .. })));
        assert_eq!(state.stroke(&sid("s1")).unwrap().point_count(), 3);
        assert_eq!(state.history_pointer(), 1);
    }

    #[test]
    fn transient_stroke_is_invisible_until_finalized() {
        let mut state = DrawingState::new();
        state.start(sid("s1"), ParticipantId::new(), red_brush());
        state.append_points(&sid("s1"), pts(5));

        assert!(state.is_transient(&sid("s1")));
        assert!(state.stroke(&sid("s1")).is_none());
        assert_eq!(state.history_len(), 0);

        state.finalize(&sid("s1"));
        assert!(!state.is_transient(&sid("s1")));
        assert!(state.stroke(&sid("s1")).is_some());
    }

    #[test]
    fn duplicate_start_does_not_overwrite_points() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        state.start(sid("s1"), owner, red_brush());
        state.append_points(&sid("s1"), pts(4));

        let blue = StrokeStyle::new("blue", 9.0, Tool::Eraser).unwrap();
        assert!(!state.start(sid("s1"), ParticipantId::new(), blue));

        let op = state.finalize(&sid("s1")).unwrap();
        match op {
            Operation::Add { stroke } => {
                assert_eq!(stroke.point_count(), 4);
                assert_eq!(stroke.style().color(), "red");
                assert_eq!(stroke.owner(), &owner);
            }
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn start_rejects_ids_of_finalized_or_removed_strokes() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "s1", owner);
        assert!(!state.start(sid("s1"), owner, red_brush()));

        state.remove(&sid("s1"));
        assert!(!state.start(sid("s1"), owner, red_brush()));
    }

    #[test]
    fn append_points_on_unknown_or_finalized_stroke_is_noop() {
        let mut state = DrawingState::new();
        assert!(state.append_points(&sid("never"), pts(3)).is_none());

        draw(&mut state, "s1", ParticipantId::new());
        let before = state.stroke(&sid("s1")).unwrap().clone();
        assert!(state.append_points(&sid("s1"), pts(3)).is_none());
        assert_eq!(state.stroke(&sid("s1")).unwrap(), &before);
        assert_eq!(state.history_len(), 1);
    }

    #[test]
    fn append_points_is_bounded_per_stroke() {
        let mut state = DrawingState::with_limits(DrawingLimits {
            max_history: 10,
            max_stroke_points: 5,
        });
        state.start(sid("s1"), ParticipantId::new(), red_brush());
        assert_eq!(state.append_points(&sid("s1"), pts(3)).unwrap().len(), 3);
        assert_eq!(state.append_points(&sid("s1"), pts(3)).unwrap().len(), 2);
        assert_eq!(state.append_points(&sid("s1"), pts(3)).unwrap().len(), 0);
    }

    #[test]
    fn finalize_unknown_stroke_returns_none() {
        let mut state = DrawingState::new();
        assert!(state.finalize(&sid("ghost")).is_none());
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn finalize_twice_records_once() {
        let mut state = DrawingState::new();
        draw(&mut state, "s1", ParticipantId::new());
        assert!(state.finalize(&sid("s1")).is_none());
        assert_eq!(state.history_len(), 1);
    }

    #[test]
    fn interleaved_transients_commit_in_end_order() {
        let mut state = DrawingState::new();
        let u1 = ParticipantId::new();
        let u2 = ParticipantId::new();

        state.start(sid("sA"), u1, red_brush());
        state.start(sid("sB"), u2, red_brush());
        state.append_points(&sid("sB"), [Point::new(10.0, 10.0)]);
        state.append_points(&sid("sA"), [Point::new(1.0, 1.0)]);
        state.append_points(&sid("sB"), [Point::new(11.0, 11.0)]);
        state.append_points(&sid("sA"), [Point::new(2.0, 2.0)]);

        state.finalize(&sid("sA"));
        state.finalize(&sid("sB"));

        let order: Vec<&str> = state.history().map(|op| op.stroke_id().as_str()).collect();
        assert_eq!(order, vec!["sA", "sB"]);
        assert_eq!(visible_ids(&state), vec!["sA", "sB"]);
        assert_eq!(
            state.stroke(&sid("sA")).unwrap().points(),
            &[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]
        );
    }

    #[test]
    fn cancel_transients_only_touches_owner() {
        let mut state = DrawingState::new();
        let u1 = ParticipantId::new();
        let u2 = ParticipantId::new();
        state.start(sid("a1"), u1, red_brush());
        state.start(sid("a2"), u1, red_brush());
        state.start(sid("b1"), u2, red_brush());
        state.append_points(&sid("a1"), pts(2));

        let mut cancelled = state.cancel_transients_by_owner(&u1);
        cancelled.sort();
        assert_eq!(cancelled, vec![sid("a1"), sid("a2")]);
        assert!(state.is_transient(&sid("b1")));
        assert_eq!(state.transient_count(), 1);
        assert_eq!(state.history_len(), 0);
        assert_eq!(state.stroke_count(), 0);
    }

    #[test]
    fn discard_leaves_no_trace() {
        let mut state = DrawingState::new();
        state.start(sid("s1"), ParticipantId::new(), red_brush());
        state.append_points(&sid("s1"), pts(2));

        assert!(state.discard(&sid("s1")));
        assert!(!state.discard(&sid("s1")));
        assert!(state.finalize(&sid("s1")).is_none());
        assert_eq!(state.history_len(), 0);
        assert_eq!(state.stroke_count(), 0);
    }

    #[test]
    fn remove_records_removed_stroke() {
        let mut state = DrawingState::new();
        draw(&mut state, "s1", ParticipantId::new());

        let op = state.remove(&sid("s1")).unwrap();
        match &op {
            Operation::Remove {
                removed_stroke: Some(stroke),
                ..
            } => assert_eq!(stroke.id(), &sid("s1")),
            other => panic!("expected remove with content, got {:?}", other),
        }
        assert_eq!(state.stroke_count(), 0);
        assert_eq!(state.history_pointer(), 2);
    }

    #[test]
    fn remove_unknown_stroke_records_nothing() {
        let mut state = DrawingState::new();
        assert!(state.remove(&sid("ghost")).is_none());
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn push_op_captures_missing_removed_stroke() {
        let mut state = DrawingState::new();
        draw(&mut state, "s1", ParticipantId::new());

        state.push_op(Operation::remove(sid("s1")));
        let last = state.history().last().unwrap();
        assert!(last.inverse().is_some());

        assert!(matches!(state.undo(), HistoryStep::Applied(Operation::Add { .. })));
        assert!(state.stroke(&sid("s1")).is_some());
    }

    #[test]
    fn push_op_ignores_add_for_visible_stroke() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "a", owner);

        let replacement = Stroke::new(sid("a"), owner, red_brush()).with_points(pts(7));
        assert!(!state.push_op(Operation::add(replacement)));
        assert_eq!(state.history_len(), 1);
        assert_eq!(state.stroke(&sid("a")).unwrap().point_count(), 2);

        state.undo();
        assert_eq!(state.stroke_count(), 0);
        assert_eq!(state.replay_applied(IndexMap::new()).len(), 0);
    }

    #[test]
    fn push_op_ignores_add_for_transient_stroke() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        state.start(sid("a"), owner, red_brush());

        let early = Stroke::new(sid("a"), owner, red_brush());
        assert!(!state.push_op(Operation::add(early)));
        assert!(state.stroke(&sid("a")).is_none());
        assert!(state.finalize(&sid("a")).is_some());
    }

    #[test]
    fn push_op_does_not_trust_removed_content_for_invisible_stroke() {
        let mut state = DrawingState::new();
        let stale = Stroke::new(sid("ghost"), ParticipantId::new(), red_brush());
        assert!(state.push_op(Operation::Remove {
            stroke_id: sid("ghost"),
            removed_stroke: Some(stale),
        }));

        assert_eq!(state.undo(), HistoryStep::Irreversible);
        assert_eq!(state.stroke_count(), 0);
    }

    #[test]
    fn stroke_id_is_reusable_once_history_forgets_it() {
        let mut state = DrawingState::with_limits(DrawingLimits {
            max_history: 2,
            max_stroke_points: 100,
        });
        let owner = ParticipantId::new();
        draw(&mut state, "s1", owner);
        state.remove(&sid("s1"));
        assert!(!state.start(sid("s1"), owner, red_brush()));

        draw(&mut state, "s2", owner);
        draw(&mut state, "s3", owner);
        assert!(state.start(sid("s1"), owner, red_brush()));
    }

    #[test]
    fn discarded_redo_tail_releases_stroke_ids() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "s1", owner);
        state.undo();
        assert!(!state.start(sid("s1"), owner, red_brush()));

        draw(&mut state, "s2", owner);
        assert!(state.start(sid("s1"), owner, red_brush()));
    }

    #[test]
    fn irreversible_entry_is_skipped_without_corrupting_state() {
        let mut state = DrawingState::new();
        draw(&mut state, "s1", ParticipantId::new());
        state.push_op(Operation::remove(sid("ghost")));
        assert_eq!(state.history_pointer(), 2);

        assert_eq!(state.undo(), HistoryStep::Irreversible);
        assert_eq!(state.history_pointer(), 1);
        assert_eq!(visible_ids(&state), vec!["s1"]);

        assert!(matches!(state.undo(), HistoryStep::Applied(_)));
        assert_eq!(state.stroke_count(), 0);
    }

    #[test]
    fn undo_on_empty_history_is_exhausted() {
        let mut state = DrawingState::new();
        assert_eq!(state.undo(), HistoryStep::Exhausted);
        assert_eq!(state.redo(), HistoryStep::Exhausted);
    }

    #[test]
    fn undo_does_not_append_to_history() {
        let mut state = DrawingState::new();
        draw(&mut state, "s1", ParticipantId::new());
        draw(&mut state, "s2", ParticipantId::new());

        state.undo();
        state.undo();
        assert_eq!(state.history_len(), 2);
        assert_eq!(state.history_pointer(), 0);
        assert_eq!(state.undo(), HistoryStep::Exhausted);
    }

    #[test]
    fn new_operation_after_undo_discards_redo_tail() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "s1", owner);
        draw(&mut state, "s2", owner);

        state.undo();
        assert!(state.can_redo());

        draw(&mut state, "s3", owner);
        assert_eq!(state.history_len(), 2);
        assert_eq!(state.redo(), HistoryStep::Exhausted);
        assert_eq!(visible_ids(&state), vec!["s1", "s3"]);
    }

    #[test]
    fn history_is_pruned_from_the_front() {
        let mut state = DrawingState::with_limits(DrawingLimits {
            max_history: 5,
            max_stroke_points: 100,
        });
        let owner = ParticipantId::new();
        for i in 0..8 {
            draw(&mut state, &format!("s{}", i), owner);
        }

        assert_eq!(state.history_len(), 5);
        assert_eq!(state.history_pointer(), 5);
        assert_eq!(state.stroke_count(), 8);
        assert_eq!(state.history().next().unwrap().stroke_id(), &sid("s3"));

        for _ in 0..5 {
            assert!(matches!(state.undo(), HistoryStep::Applied(_)));
        }
        assert_eq!(state.undo(), HistoryStep::Exhausted);
        assert_eq!(visible_ids(&state), vec!["s0", "s1", "s2"]);
    }

    #[test]
    fn pruning_with_redo_tail_keeps_pointer_in_range() {
        let mut state = DrawingState::with_limits(DrawingLimits {
            max_history: 3,
            max_stroke_points: 100,
        });
        let owner = ParticipantId::new();
        for i in 0..3 {
            draw(&mut state, &format!("s{}", i), owner);
        }
        state.undo();
        draw(&mut state, "s3", owner);
        draw(&mut state, "s4", owner);

        assert!(state.history_pointer() <= state.history_len());
        assert_eq!(state.history_len(), 3);
        assert_eq!(state.history_pointer(), 3);
        assert_eq!(visible_ids(&state), vec!["s0", "s1", "s3", "s4"]);
    }

    #[test]
    fn zero_history_bound_is_raised_to_one() {
        let mut state = DrawingState::with_limits(DrawingLimits {
            max_history: 0,
            max_stroke_points: 100,
        });
        draw(&mut state, "s1", ParticipantId::new());
        assert_eq!(state.history_len(), 1);
        assert_eq!(state.limits().max_history, 1);
    }

    #[test]
    fn undone_remove_returns_stroke_on_top() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "a", owner);
        draw(&mut state, "b", owner);
        state.remove(&sid("a"));
        assert_eq!(visible_ids(&state), vec!["b"]);

        state.undo();
        assert_eq!(visible_ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn replay_matches_visible_strokes() {
        let mut state = DrawingState::new();
        let owner = ParticipantId::new();
        draw(&mut state, "a", owner);
        draw(&mut state, "b", owner);
        state.remove(&sid("a"));
        draw(&mut state, "c", owner);
        state.undo();

        let replayed = state.replay_applied(IndexMap::new());
        let mut replayed_ids: Vec<&str> = replayed.keys().map(StrokeId::as_str).collect();
        replayed_ids.sort();
        let mut visible = visible_ids(&state);
        visible.sort();
        assert_eq!(replayed_ids, visible);
    }
}
