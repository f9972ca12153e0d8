//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique `x-request-id` (UUID v4) for every request
//! - Keep a client-supplied id untouched
//! - Echo the id on the response for correlation
//!
//! # Design Decisions
//! - Request ID added as the outermost layer so every log line carries it

use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Wrap `router` with request id generation and propagation.
pub fn with_request_id(router: Router) -> Router {
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
