//! Handles to a running room and to one participant's membership in it.

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::domain::foundation::{ParticipantId, RoomId};
use crate::domain::room::{Room, RoomSnapshot, RoomSummary};

use super::actor::RoomActor;
use super::commands::{ParticipantEvent, RoomCommand, RoomEvent};
use super::error::RoomError;

/// Cloneable address of a room actor.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    commands: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Spawn the actor for `room` on the current runtime.
    pub(crate) fn spawn(room: Room, queue_capacity: usize) -> Self {
        let room_id = room.id().clone();
        let (commands, rx) = mpsc::channel(queue_capacity.max(1));
        let span = tracing::info_span!("room", room_id = %room_id);
        tokio::spawn(RoomActor::new(room).run(rx).instrument(span));
        Self { room_id, commands }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Join the room as a new participant.
    ///
    /// Returns the session used to submit events and the receiving half of
    /// the participant's outbox. The first event on the outbox is always
    /// [`RoomEvent::Joined`].
    pub async fn join(
        &self,
        outbox_capacity: usize,
    ) -> Result<(ParticipantSession, mpsc::Receiver<RoomEvent>), RoomError> {
        let participant = ParticipantId::new();
        let (outbox, events) = mpsc::channel(outbox_capacity.max(1));
        self.submit(RoomCommand::Join {
            participant,
            outbox,
        })
        .await?;

        let session = ParticipantSession {
            participant,
            room: self.clone(),
            left: false,
        };
        Ok((session, events))
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.submit(RoomCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.submit(RoomCommand::Summary { reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    /// Ask the actor to stop after the commands already queued.
    pub(crate) async fn shutdown(&self) {
        let _ = self.commands.send(RoomCommand::Shutdown).await;
    }

    async fn submit(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.commands.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> RoomError {
        RoomError::Closed(self.room_id.clone())
    }
}

/// One participant's membership in a room.
///
/// Events submitted through a session reach the room in submission order.
/// Dropping the session without calling [`leave`](Self::leave) still
/// removes the participant.
#[derive(Debug)]
pub struct ParticipantSession {
    participant: ParticipantId,
    room: RoomHandle,
    left: bool,
}

impl ParticipantSession {
    pub fn participant_id(&self) -> ParticipantId {
        self.participant
    }

    pub fn room_id(&self) -> &RoomId {
        self.room.room_id()
    }

    /// Queue an event for the room. Waits if the room queue is full.
    pub async fn send(&self, event: ParticipantEvent) -> Result<(), RoomError> {
        self.room
            .submit(RoomCommand::Event {
                participant: self.participant,
                event,
            })
            .await
    }

    /// Leave the room. Unfinished strokes of this participant are discarded.
    pub async fn leave(mut self) {
        self.left = true;
        let _ = self
            .room
            .submit(RoomCommand::Leave {
                participant: self.participant,
            })
            .await;
    }
}

impl Drop for ParticipantSession {
    fn drop(&mut self) {
        if self.left {
            return;
        }
        let command = RoomCommand::Leave {
            participant: self.participant,
        };
        match self.room.commands.try_send(command) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(command)) => {
                match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => {
                        let commands = self.room.commands.clone();
                        runtime.spawn(async move {
                            let _ = commands.send(command).await;
                        });
                    }
                    Err(_) => {
                        tracing::warn!(
                            user_id = %self.participant,
                            room_id = %self.room.room_id,
                            "Could not queue leave for dropped session"
                        );
                    }
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}
