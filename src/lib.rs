//! Bootstrap multi-step, multi-tenant journey applications from a list of
//! route descriptors.
//!
//! ```no_run
//! use journey_bootstrap::{bootstrap, AppConfig, RouteConfig, StepConfig};
//!
//! # async fn run() -> Result<(), journey_bootstrap::BootstrapError> {
//! let config = AppConfig {
//!     routes: vec![RouteConfig {
//!         views: Some("apps/app_1/views".into()),
//!         steps: [("/one".to_string(), StepConfig::default())].into_iter().collect(),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let mut app = bootstrap(config).await?;
//! app.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod controllers;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod views;

pub use app::{bootstrap, App, BootstrapError};
pub use config::{AppConfig, ConfigError, Protocol, RouteConfig, StartOptions, StepConfig};
pub use controllers::{BaseController, Controller, ControllerError, ControllerFactory, ControllerOptions, StepRequest};
pub use lifecycle::Lifecycle;
pub use views::{Theme, ViewError};
