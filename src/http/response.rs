//! Response helpers.
//!
//! # Responsibilities
//! - Map step failures to HTTP responses
//! - Provide the pipeline's final 404
//!
//! # Design Decisions
//! - Failures render a generic page; resolved directories and messages
//!   stay in the logs, never in the body

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::controllers::StepError;

impl IntoResponse for StepError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Sorry, there is a problem with the service</h1>\n"),
        )
            .into_response()
    }
}

/// Fallback for requests no pipeline entry matched.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<h1>Page not found</h1>\n"))
}
