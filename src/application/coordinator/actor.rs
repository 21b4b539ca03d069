//! Room actor - the single serialization point for one room.
//!
//! Every participant event for a room is queued on one `mpsc` channel and
//! handled here, one command at a time. Handling is synchronous: nothing is
//! awaited between dequeuing a command and finishing its state change and
//! fan-out, so two mutating events can never interleave.
//!
//! Fan-out uses `try_send` into bounded per-member outboxes. A member whose
//! outbox is full misses that message (at-most-once delivery); the actor is
//! never blocked by a slow connection.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::canvas::{HistoryStep, Operation, Point};
use crate::domain::foundation::{ParticipantId, StrokeId};
use crate::domain::room::Room;

use super::commands::{NoOpReason, ParticipantEvent, RoomCommand, RoomEvent};

pub(crate) struct RoomActor {
    room: Room,
    outboxes: HashMap<ParticipantId, mpsc::Sender<RoomEvent>>,
}

/// Whether the actor should keep consuming its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

impl RoomActor {
    pub(crate) fn new(room: Room) -> Self {
        Self {
            room,
            outboxes: HashMap::new(),
        }
    }

    /// Consume commands until the queue closes or a shutdown is requested.
    pub(crate) async fn run(mut self, mut commands: mpsc::Receiver<RoomCommand>) {
        tracing::debug!("Room actor started");
        while let Some(command) = commands.recv().await {
            if self.handle(command) == Flow::Stop {
                break;
            }
        }
        tracing::debug!(
            members = self.outboxes.len(),
            strokes = self.room.state().stroke_count(),
            "Room actor stopped"
        );
    }

    #[cfg(test)]
    pub(crate) fn room(&self) -> &Room {
        &self.room
    }

    pub(crate) fn handle(&mut self, command: RoomCommand) -> Flow {
        match command {
            RoomCommand::Join {
                participant,
                outbox,
            } => self.join(participant, outbox),
            RoomCommand::Event { participant, event } => {
                if self.outboxes.contains_key(&participant) {
                    self.handle_event(participant, event);
                } else {
                    tracing::debug!(user_id = %participant, "Dropping event from non-member");
                }
            }
            RoomCommand::Leave { participant } => self.leave(participant),
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.room.snapshot());
            }
            RoomCommand::Summary { reply } => {
                let _ = reply.send(self.room.summary());
            }
            RoomCommand::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────────

    fn join(&mut self, participant: ParticipantId, outbox: mpsc::Sender<RoomEvent>) {
        if !self.room.add_member(participant) {
            tracing::debug!(user_id = %participant, "Ignoring duplicate join");
            return;
        }
        self.outboxes.insert(participant, outbox);

        self.send_to(
            &participant,
            RoomEvent::Joined {
                user_id: participant,
                snapshot: self.room.snapshot(),
            },
        );
        self.broadcast_except(&participant, RoomEvent::UserJoined { user_id: participant });

        tracing::info!(
            user_id = %participant,
            members = self.room.member_count(),
            "Participant joined"
        );
    }

    fn leave(&mut self, participant: ParticipantId) {
        if !self.room.remove_member(&participant) {
            return;
        }
        self.outboxes.remove(&participant);
        self.broadcast_except(&participant, RoomEvent::UserLeft { user_id: participant });

        tracing::info!(
            user_id = %participant,
            members = self.room.member_count(),
            "Participant left"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Participant events
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_event(&mut self, from: ParticipantId, event: ParticipantEvent) {
        match event {
            ParticipantEvent::Cursor { x, y, color } => {
                self.broadcast_except(
                    &from,
                    RoomEvent::Cursor {
                        user_id: from,
                        x,
                        y,
                        color,
                    },
                );
            }
            ParticipantEvent::StrokeStart { stroke_id, style } => {
                if self
                    .room
                    .state_mut()
                    .start(stroke_id.clone(), from, style.clone())
                {
                    self.broadcast_except(
                        &from,
                        RoomEvent::StrokeStarted {
                            user_id: from,
                            stroke_id,
                            style,
                        },
                    );
                }
            }
            ParticipantEvent::StrokeChunk { stroke_id, points } => {
                self.stroke_chunk(from, stroke_id, points);
            }
            ParticipantEvent::StrokeEnd { stroke_id } => self.stroke_end(from, stroke_id),
            ParticipantEvent::StrokeRemove { stroke_id } => {
                match self.room.state_mut().remove(&stroke_id) {
                    Some(op) => self.broadcast_operation(op),
                    None => {
                        tracing::debug!(stroke_id = %stroke_id, "Remove for unknown stroke absorbed");
                    }
                }
            }
            ParticipantEvent::Undo => {
                let step = self.room.state_mut().undo();
                self.history_step(from, step, NoOpReason::NothingToUndo);
            }
            ParticipantEvent::Redo => {
                let step = self.room.state_mut().redo();
                self.history_step(from, step, NoOpReason::NothingToRedo);
            }
            ParticipantEvent::RequestState => {
                self.send_to(&from, RoomEvent::State(self.room.snapshot()));
            }
            ParticipantEvent::Ping => self.send_to(&from, RoomEvent::Pong),
        }
    }

    fn stroke_chunk(&mut self, from: ParticipantId, stroke_id: StrokeId, points: Vec<Point>) {
        if !self.owns_transient(&from, &stroke_id) {
            return;
        }
        let appended: Vec<Point> = match self.room.state_mut().append_points(&stroke_id, points) {
            Some(appended) => appended.to_vec(),
            None => return,
        };
        if appended.is_empty() {
            return;
        }
        self.broadcast_except(
            &from,
            RoomEvent::StrokeChunk {
                user_id: from,
                stroke_id,
                points: appended,
            },
        );
    }

    fn stroke_end(&mut self, from: ParticipantId, stroke_id: StrokeId) {
        if !self.owns_transient(&from, &stroke_id) {
            return;
        }
        let Some(op) = self.room.state_mut().finalize(&stroke_id) else {
            return;
        };
        tracing::debug!(
            stroke_id = %stroke_id,
            user_id = %from,
            history_pointer = self.room.state().history_pointer(),
            "Stroke committed"
        );
        self.broadcast_operation(op);
        self.broadcast_except(
            &from,
            RoomEvent::StrokeEnded {
                user_id: from,
                stroke_id,
            },
        );
    }

    fn history_step(&mut self, from: ParticipantId, step: HistoryStep, exhausted: NoOpReason) {
        match step {
            HistoryStep::Applied(op) => self.broadcast_operation(op),
            HistoryStep::Irreversible => self.send_to(
                &from,
                RoomEvent::NoOp {
                    reason: NoOpReason::Irreversible,
                },
            ),
            HistoryStep::Exhausted => self.send_to(&from, RoomEvent::NoOp { reason: exhausted }),
        }
    }

    /// Late or foreign events for a stroke are absorbed here.
    fn owns_transient(&self, from: &ParticipantId, stroke_id: &StrokeId) -> bool {
        match self.room.state().transient_owner(stroke_id) {
            Some(owner) if owner == from => true,
            Some(_) => {
                tracing::debug!(stroke_id = %stroke_id, user_id = %from, "Event for another participant's stroke absorbed");
                false
            }
            None => {
                tracing::debug!(stroke_id = %stroke_id, user_id = %from, "Event for a stroke that is not in progress absorbed");
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fan-out
    // ─────────────────────────────────────────────────────────────────────────

    fn broadcast_operation(&self, op: Operation) {
        let history_pointer = self.room.state().history_pointer();
        self.broadcast_all(RoomEvent::OperationApplied {
            op,
            history_pointer,
        });
    }

    fn send_to(&self, to: &ParticipantId, event: RoomEvent) {
        if let Some(outbox) = self.outboxes.get(to) {
            deliver(to, outbox, event);
        }
    }

    fn broadcast_all(&self, event: RoomEvent) {
        for (member, outbox) in &self.outboxes {
            deliver(member, outbox, event.clone());
        }
    }

    fn broadcast_except(&self, except: &ParticipantId, event: RoomEvent) {
        for (member, outbox) in self.outboxes.iter().filter(|(id, _)| *id != except) {
            deliver(member, outbox, event.clone());
        }
    }
}

fn deliver(to: &ParticipantId, outbox: &mpsc::Sender<RoomEvent>, event: RoomEvent) {
    match outbox.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!(user_id = %to, "Outbox full, dropping message");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(user_id = %to, "Outbox closed, dropping message");
        }
    }
}
