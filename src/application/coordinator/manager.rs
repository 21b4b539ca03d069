//! Registry of live rooms.
//!
//! # Architecture
//!
//! ```text
//! RoomManager
//! ├── main    → RoomHandle → RoomActor (Room: members + DrawingState)
//! ├── lobby   → RoomHandle → RoomActor
//! └── studio  → RoomHandle → RoomActor
//! ```
//!
//! The manager only maps ids to handles. Everything that touches a room's
//! state happens inside that room's actor.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::canvas::DrawingLimits;
use crate::domain::foundation::RoomId;
use crate::domain::room::{Room, RoomSummary};

use super::error::RoomError;
use super::handle::RoomHandle;

/// Default capacity of each room's command queue.
pub const DEFAULT_ROOM_QUEUE_CAPACITY: usize = 1024;

/// Default capacity of each participant's outbox.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Settings applied to every room the manager creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    pub limits: DrawingLimits,
    pub queue_capacity: usize,
    pub outbox_capacity: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            limits: DrawingLimits::default(),
            queue_capacity: DEFAULT_ROOM_QUEUE_CAPACITY,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

/// Creates and looks up rooms.
///
/// # Thread Safety
///
/// Uses `RwLock` for the registry since lookups vastly outnumber room
/// creation. The lock is never held across a call into a room.
pub struct RoomManager {
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    settings: RoomSettings,
}

impl RoomManager {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            settings,
        }
    }

    pub fn with_default_settings() -> Self {
        Self::new(RoomSettings::default())
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    /// Create a room with an empty canvas.
    ///
    /// Fails if a live room with this id already exists.
    pub async fn create_room(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        let mut rooms = self.rooms.write().await;
        if let Some(existing) = rooms.get(&room_id) {
            if !existing.is_closed() {
                return Err(RoomError::AlreadyExists(room_id));
            }
        }
        let handle = self.spawn(room_id.clone());
        rooms.insert(room_id, handle.clone());
        Ok(handle)
    }

    /// Look up a live room.
    pub async fn get_room(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Look up a room, creating it on first use.
    pub async fn get_or_create(&self, room_id: RoomId) -> RoomHandle {
        if let Some(handle) = self.get_room(&room_id).await {
            return handle;
        }

        let mut rooms = self.rooms.write().await;
        // Another connection may have created it while we waited for the lock.
        if let Some(handle) = rooms.get(&room_id).filter(|h| !h.is_closed()) {
            return handle.clone();
        }
        let handle = self.spawn(room_id.clone());
        rooms.insert(room_id, handle.clone());
        handle
    }

    /// Ids of all live rooms, sorted.
    pub async fn active_rooms(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self
            .rooms
            .read()
            .await
            .iter()
            .filter(|(_, handle)| !handle.is_closed())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub async fn room_count(&self) -> usize {
        self.rooms
            .read()
            .await
            .values()
            .filter(|handle| !handle.is_closed())
            .count()
    }

    /// Counters for every live room, sorted by id.
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.summary().await {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::debug!(error = %e, "Skipping room in summary"),
            }
        }
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    /// Stop every room actor and forget them.
    pub async fn shutdown(&self) {
        let handles: Vec<RoomHandle> = self.rooms.write().await.drain().map(|(_, h)| h).collect();
        tracing::info!(rooms = handles.len(), "Shutting down rooms");
        for handle in handles {
            handle.shutdown().await;
        }
    }

    fn spawn(&self, room_id: RoomId) -> RoomHandle {
        tracing::info!(room_id = %room_id, "Room created");
        let room = Room::new(room_id, self.settings.limits);
        RoomHandle::spawn(room, self.settings.queue_capacity)
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_settings()
    }
}
