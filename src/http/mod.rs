//! HTTP pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → request.rs (x-request-id)
//!     → server.rs pipeline: health → /public → theme → handlers
//!       → pages → journey routes → 404
//!     → response.rs (step failures, not found)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::Pipeline;
