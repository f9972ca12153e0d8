//! Step controllers.
//!
//! # Data Flow
//! ```text
//! Mount time:
//!     StepConfig + RouteConfig + AppConfig
//!     → resolver.rs (step → route → app → default, first set wins)
//!     → ControllerBinding { factory, options }
//!     → factory(options), exactly once per step
//!
//! Request time:
//!     StepRequest → Controller::get → Response
//! ```
//!
//! # Design Decisions
//! - Overrides are factories taking one options struct, not subclasses;
//!   a custom controller wraps `BaseController` to reuse its rendering
//! - Controllers are immutable after construction and shared via Arc

pub mod base;
pub mod resolver;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Response;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::views::{ViewEngine, ViewError, ViewResolutionChain};

pub use base::BaseController;
pub use resolver::{resolve, ControllerBinding, ControllerSource};

/// Everything a controller is constructed from.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Step path as configured (`/one`).
    pub route: String,
    /// Template the step renders.
    pub template: String,
    /// Resolved fields directory, if any.
    pub fields: Option<PathBuf>,
    /// View chain of the owning route.
    pub views: Arc<ViewResolutionChain>,
    /// Renderer shared by the whole application.
    pub engine: Arc<ViewEngine>,
    /// Opaque application payload.
    pub app_config: serde_json::Value,
    /// Values every render of this step starts from
    /// (`assetPath`, `baseUrl`, `gaTagId`).
    pub locals: serde_json::Map<String, serde_json::Value>,
}

/// A GET request addressed to a step.
#[derive(Debug, Clone, Default)]
pub struct StepRequest {
    /// Request path as received.
    pub path: String,
    /// Values captured by the route's params pattern.
    pub params: HashMap<String, String>,
}

/// Failure while constructing a controller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ControllerError {
    pub message: String,
}

impl ControllerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure while handling a step request.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    View(#[from] ViewError),

    #[error("{0}")]
    Handler(String),
}

/// Request-handling capability of a step.
pub trait Controller: Send + Sync {
    /// Handle a GET for this step.
    fn get(&self, request: StepRequest) -> BoxFuture<'_, Result<Response, StepError>>;
}

type BuildFn =
    dyn Fn(ControllerOptions) -> Result<Arc<dyn Controller>, ControllerError> + Send + Sync;

/// Constructor for a controller, taking one options struct.
#[derive(Clone)]
pub struct ControllerFactory {
    name: String,
    build: Arc<BuildFn>,
}

impl ControllerFactory {
    /// Wrap a constructor under a display name.
    pub fn new<F, C>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(ControllerOptions) -> Result<C, ControllerError> + Send + Sync + 'static,
        C: Controller + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(move |options| {
                build(options).map(|c| Arc::new(c) as Arc<dyn Controller>)
            }),
        }
    }

    /// The system default: renders the step's template.
    pub fn base() -> Self {
        Self::new("BaseController", |options| Ok(BaseController::new(options)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the constructor.
    pub fn construct(&self, options: ControllerOptions) -> Result<Arc<dyn Controller>, ControllerError> {
        (self.build)(options)
    }
}

impl fmt::Debug for ControllerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControllerFactory").field(&self.name).finish()
    }
}
