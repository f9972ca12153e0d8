//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig { protocol, host, port, tls }
//!     → listener.rs (resolve, bind, serve pipeline)
//!     → tls.rs (certificate loading, https only)
//!     → ServerHandle (lifecycle::shutdown) owned by the App
//! ```
//!
//! # Design Decisions
//! - Binding happens last, after composition and readiness
//! - TLS is optional and handled transparently

pub mod listener;
pub mod tls;
