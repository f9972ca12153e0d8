//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Validation time:
//!     base_url + step path + params pattern
//!     → matcher.rs (normalize, expand optional segments)
//!     → MountPath[] per step
//!
//! Composition (first start):
//!     ValidatedRoute
//!     → composer.rs (view chain, controller per step)
//!     → MountedRoute → axum Router
//! ```
//!
//! # Design Decisions
//! - Routes composed once, immutable afterwards
//! - Identical final paths are rejected at validation, never shadowed
//! - Deterministic: same config always yields the same paths

pub mod composer;
pub mod matcher;

pub use composer::{MountedRoute, MountedStep};
