//! Canvas and room configuration

use serde::Deserialize;

use crate::application::coordinator::{
    RoomSettings, DEFAULT_OUTBOX_CAPACITY, DEFAULT_ROOM_QUEUE_CAPACITY,
};
use crate::domain::canvas::{DrawingLimits, MAX_HISTORY, MAX_STROKE_POINTS};
use crate::domain::foundation::RoomId;

use super::error::ValidationError;

/// Canvas configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    /// Room joined by connections on `/ws`
    #[serde(default = "default_room")]
    pub default_room: String,

    /// Undo history entries kept per room
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Points accepted per stroke
    #[serde(default = "default_max_stroke_points")]
    pub max_stroke_points: usize,

    /// Commands buffered per room before connections wait
    #[serde(default = "default_room_queue_capacity")]
    pub room_queue_capacity: usize,

    /// Messages buffered per connection before they are dropped
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

impl CanvasConfig {
    /// Parsed default room id
    pub fn default_room_id(&self) -> Result<RoomId, ValidationError> {
        self.default_room
            .parse()
            .map_err(|_| ValidationError::InvalidDefaultRoom(self.default_room.clone()))
    }

    /// Settings for every room the server creates
    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            limits: DrawingLimits {
                max_history: self.max_history,
                max_stroke_points: self.max_stroke_points,
            },
            queue_capacity: self.room_queue_capacity,
            outbox_capacity: self.outbox_capacity,
        }
    }

    /// Validate canvas configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.default_room_id()?;
        if self.max_history == 0 {
            return Err(ValidationError::MustBePositive("canvas.max_history"));
        }
        if self.max_stroke_points == 0 {
            return Err(ValidationError::MustBePositive("canvas.max_stroke_points"));
        }
        if self.room_queue_capacity == 0 {
            return Err(ValidationError::MustBePositive("canvas.room_queue_capacity"));
        }
        if self.outbox_capacity == 0 {
            return Err(ValidationError::MustBePositive("canvas.outbox_capacity"));
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_room: default_room(),
            max_history: default_max_history(),
            max_stroke_points: default_max_stroke_points(),
            room_queue_capacity: default_room_queue_capacity(),
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

fn default_room() -> String {
    "main".to_string()
}

fn default_max_history() -> usize {
    MAX_HISTORY
}

fn default_max_stroke_points() -> usize {
    MAX_STROKE_POINTS
}

fn default_room_queue_capacity() -> usize {
    DEFAULT_ROOM_QUEUE_CAPACITY
}

fn default_outbox_capacity() -> usize {
    DEFAULT_OUTBOX_CAPACITY
}
