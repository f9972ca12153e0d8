//! Health checking endpoints.
//!
//! # Endpoints
//! - `GET /healthz/ping`: shallow liveness check, always 200 while the
//!   pipeline is serving
//!
//! # Design Decisions
//! - Mounted ahead of every journey route so a step can never shadow it
//! - No dependencies are probed; a failing collaborator must not take the
//!   liveness signal down with it

use axum::{routing::get, Router};

pub const PING_PATH: &str = "/healthz/ping";

/// Router exposing the health endpoints.
pub fn router() -> Router {
    Router::new().route(PING_PATH, get(ping))
}

async fn ping() -> &'static str {
    "pong"
}
