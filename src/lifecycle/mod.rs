//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate → Compose routes → Await readiness gates → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     stop() → Stop accepting → Drain (bounded) → Close
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary calls stop()
//! ```
//!
//! # Design Decisions
//! - Created → Running → Stopped, with start/stop as guarded transitions
//! - Ordered startup: config first, then routes, then listener
//! - Shutdown has timeout: forced close after the drain deadline

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::ServerHandle;
pub use startup::{BoxError, Readiness};
pub use state::{Lifecycle, LifecycleEvent};
