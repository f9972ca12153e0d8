//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or AppConfig built in code
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (structural + filesystem checks, mount paths)
//!     → ValidatedConfig (immutable, owned by the App)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated; only start overrides
//!   (host, port, protocol) are merged later
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{AppConfig, ObservabilityConfig, Protocol, RouteConfig, StartOptions, StepConfig, TimeoutConfig, TlsConfig};
pub use validation::{ConfigError, ValidatedConfig};
