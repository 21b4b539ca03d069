//! Adapters - transports connecting rooms to the outside world.
//!
//! - `http` - monitoring endpoints and the application router
//! - `websocket` - the live drawing protocol

pub mod http;
pub mod websocket;

pub use http::build_router;
pub use websocket::{websocket_router, WebSocketState};
