//! Stroke records: an ordered point sequence plus style.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ParticipantId, StrokeId, ValidationError};

/// Maximum length for a color token.
pub const MAX_COLOR_LENGTH: usize = 64;

/// A point in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Drawing tool a stroke was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

/// Visual attributes fixed when a stroke starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    color: String,
    width: f64,
    #[serde(default)]
    tool: Tool,
}

impl StrokeStyle {
    /// Create a validated style.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `TooLong` if the color token is empty or oversized
    /// - `NotPositive` if width is zero, negative, or not finite
    pub fn new(color: impl Into<String>, width: f64, tool: Tool) -> Result<Self, ValidationError> {
        let color = color.into();
        if color.is_empty() {
            return Err(ValidationError::empty_field("color"));
        }
        if color.len() > MAX_COLOR_LENGTH {
            return Err(ValidationError::too_long("color", MAX_COLOR_LENGTH, color.len()));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(ValidationError::not_positive("width", width));
        }
        Ok(Self { color, width, tool })
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }
}

/// A freehand path drawn by one participant.
///
/// Points are only appended while the stroke is transient; once
/// finalized the stroke is treated as immutable content identified by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    id: StrokeId,
    user_id: ParticipantId,
    #[serde(flatten)]
    style: StrokeStyle,
    points: Vec<Point>,
}

impl Stroke {
    /// Create an empty stroke owned by `owner`.
    pub fn new(id: StrokeId, owner: ParticipantId, style: StrokeStyle) -> Self {
        Self {
            id,
            user_id: owner,
            style,
            points: Vec::new(),
        }
    }

    /// Builder-style helper for constructing complete strokes.
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }

    pub fn id(&self) -> &StrokeId {
        &self.id
    }

    /// The participant that drew this stroke.
    pub fn owner(&self) -> &ParticipantId {
        &self.user_id
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Appends finite points in order, up to `limit` total points.
    ///
    /// Returns the slice of points actually appended.
    pub(super) fn append_points(
        &mut self,
        points: impl IntoIterator<Item = Point>,
        limit: usize,
    ) -> &[Point] {
        let start = self.points.len();
        let room = limit.saturating_sub(start);
        self.points
            .extend(points.into_iter().filter(Point::is_finite).take(room));
        &self.points[start..]
    }
}
