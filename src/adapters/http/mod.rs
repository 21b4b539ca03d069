//! HTTP adapters - monitoring endpoints and the assembled application router.

mod rooms;

pub use rooms::{health, list_rooms, HealthResponse};

use std::sync::Arc;

use axum::{extract::FromRef, http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::application::coordinator::RoomManager;
use crate::config::ServerConfig;

impl FromRef<WebSocketState> for Arc<RoomManager> {
    fn from_ref(state: &WebSocketState) -> Self {
        state.room_manager.clone()
    }
}

/// Build the full application router.
///
/// ```text
/// GET /health                  liveness
/// GET /api/rooms               room summaries
/// GET /api/rooms/:room_id/live WebSocket into a named room
/// GET /ws                      WebSocket into the default room
/// ```
pub fn build_router(state: WebSocketState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rooms", get(list_rooms))
        .merge(websocket_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}
