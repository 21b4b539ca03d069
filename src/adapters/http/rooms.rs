//! HTTP handlers for health and room monitoring.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::coordinator::RoomManager;
use crate::domain::room::RoomSummary;

/// Liveness response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/rooms - counters for every live room
pub async fn list_rooms(State(rooms): State<Arc<RoomManager>>) -> Json<Vec<RoomSummary>> {
    Json(rooms.summaries().await)
}
