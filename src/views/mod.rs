//! View resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Mount time (once per route):
//!     route.views? → app.views? → theme views | built-in partials
//!     → chain.rs (dedupe, freeze as ViewResolutionChain)
//!
//! Request time:
//!     template name + chain
//!     → engine.rs (walk chain in order, first hit wins, cached per chain)
//!     → handlebars render with locals
//! ```
//!
//! # Design Decisions
//! - A chain is computed once and never re-evaluated per request
//! - Route directories beat shared ones, shared beat the library default
//! - Lookup cache is keyed by chain identity, so routes never leak
//!   templates into each other

pub mod chain;
pub mod engine;
pub mod partials;

use std::fmt::Debug;
use std::path::PathBuf;

use axum::Router;
use thiserror::Error;

pub use chain::{ChainId, ViewDir, ViewResolutionChain};
pub use engine::ViewEngine;

/// Errors raised while locating or rendering a template.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Template {name:?} not found in views [{}]", searched.join(", "))]
    TemplateNotFound { name: String, searched: Vec<String> },

    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {name:?}: {message}")]
    Render { name: String, message: String },
}

/// A look-and-feel package: extra view directories plus a hook that may
/// add handlers (assets, headers) to the shared pipeline.
pub trait Theme: Send + Sync + Debug {
    /// View directories, consulted after route and shared views.
    fn views(&self) -> Vec<PathBuf>;

    /// Called once while the pipeline is assembled.
    fn setup(&self, router: Router) -> Router {
        router
    }
}
