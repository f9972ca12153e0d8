//! The journey application: construction and lifecycle.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → App::new (Phase 1a: synchronous validation, fail fast)
//!     → App::start
//!         → compose routes once (Phase 1b: controllers constructed)
//!         → await readiness gates (Phase 2)
//!         → assemble pipeline + readiness-dependent pages
//!         → bind listener, Running
//!     → App::stop (drain, close, Stopped)
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;

use crate::config::schema::{AppConfig, StartOptions};
use crate::config::validation::{validate_config, ConfigError, ValidatedConfig};
use crate::http::server::{pages_router, Pipeline};
use crate::lifecycle::{BoxError, Lifecycle, LifecycleEvent, Readiness, ServerHandle};
use crate::net::listener::{self, ListenerError};
use crate::observability::metrics;
use crate::routing::composer::{compose_all, ComposeError, MountedRoute};
use crate::views::ViewEngine;

/// Errors surfaced by construction and lifecycle operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ControllerConstruction(#[from] ComposeError),

    #[error("Readiness gate failed: {0}")]
    Readiness(String),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Failed to stop listener: {0}")]
    Shutdown(#[source] std::io::Error),
}

/// A journey application.
pub struct App {
    config: ValidatedConfig,
    engine: Arc<ViewEngine>,
    handlers: Vec<Router>,
    readiness: Readiness,
    mounted: Option<Vec<MountedRoute>>,
    lifecycle: Lifecycle,
    server: Option<ServerHandle>,
}

impl App {
    /// Validate `config` and create a stopped application.
    ///
    /// Fails on the first invalid setting; nothing is bound or composed.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let config = validate_config(config)?;
        let engine = Arc::new(ViewEngine::new(
            config.config.view_engine.clone(),
            config.config.view_cache,
        ));

        tracing::info!(
            routes = config.routes.len(),
            root = %config.root.display(),
            "Configuration validated"
        );

        Ok(Self {
            config,
            engine,
            handlers: Vec::new(),
            readiness: Readiness::new(),
            mounted: None,
            lifecycle: Lifecycle::Created,
            server: None,
        })
    }

    /// Append a router to the pipeline. Routers are consulted in insertion
    /// order, after health/static handlers and before journey routes.
    /// Any fallback set on `router` is replaced.
    pub fn use_handler(&mut self, router: Router) -> &mut Self {
        if self.lifecycle.is_running() {
            tracing::warn!("Handler added while running; it takes effect on the next start");
        }
        self.handlers.push(router);
        self
    }

    /// Register a readiness gate awaited by the first `start` before the
    /// cookies/terms pages are mounted and before the listener binds.
    pub fn on_ready<F>(&mut self, gate: F) -> &mut Self
    where
        F: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.readiness.add(gate);
        self
    }

    /// Compose (once) and assemble the pipeline without binding.
    pub async fn router(&mut self) -> Result<Router, BootstrapError> {
        self.compose()?;
        self.readiness.wait().await.map_err(BootstrapError::Readiness)?;

        let pages = pages_router(&self.config, &self.engine);
        let mounted = self.mounted.as_deref().unwrap_or_default();
        Ok(Pipeline {
            app: &self.config,
            handlers: &self.handlers,
            pages: Some(pages),
            routes: mounted,
        }
        .build())
    }

    /// Start listening.
    ///
    /// Returns `Ok(false)` without side effects when already running.
    /// Overrides are merged into the stored configuration once the
    /// listener is bound; a failed start leaves the configuration as it was.
    pub async fn start(&mut self, overrides: StartOptions) -> Result<bool, BootstrapError> {
        if self.lifecycle.is_running() {
            tracing::warn!("App already started");
            return Ok(false);
        }
        let mut effective = self.config.config.clone();
        overrides.apply(&mut effective);

        let router = self.router().await?;
        let server = listener::serve(&effective, router).await?;
        self.config.config = effective;

        if let Some(next) = self.lifecycle.next(LifecycleEvent::Started) {
            self.lifecycle = next;
        }
        self.server = Some(server);
        metrics::record_running(true);
        Ok(true)
    }

    /// Stop listening, draining in-flight requests for at most
    /// `timeouts.shutdown_drain_secs`.
    ///
    /// Returns `Ok(false)` without side effects when not running.
    pub async fn stop(&mut self) -> Result<bool, BootstrapError> {
        let next = match self.lifecycle.next(LifecycleEvent::Stopped) {
            Some(next) => next,
            None => {
                tracing::debug!(state = %self.lifecycle, "Stop ignored");
                return Ok(false);
            }
        };

        let drain = Duration::from_secs(self.config.config.timeouts.shutdown_drain_secs);
        let result = match self.server.take() {
            Some(server) => server.shutdown(drain).await,
            None => Ok(()),
        };
        self.lifecycle = next;
        metrics::record_running(false);
        result.map_err(BootstrapError::Shutdown)?;
        Ok(true)
    }

    /// The running listener, `None` until the first successful start and
    /// after a stop.
    pub fn server(&self) -> Option<&ServerHandle> {
        self.server.as_ref()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(ServerHandle::local_addr)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Routes composed so far (empty before the first `start`/`router`).
    pub fn mounted(&self) -> &[MountedRoute] {
        self.mounted.as_deref().unwrap_or_default()
    }

    fn compose(&mut self) -> Result<(), ComposeError> {
        if self.mounted.is_none() {
            let mounted = compose_all(&self.config, &self.engine)?;
            tracing::info!(
                routes = mounted.len(),
                steps = mounted.iter().map(|r| r.steps.len()).sum::<usize>(),
                "Routes composed"
            );
            self.mounted = Some(mounted);
        }
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("lifecycle", &self.lifecycle)
            .field("routes", &self.config.routes.len())
            .field("handlers", &self.handlers.len())
            .field("readiness", &self.readiness)
            .field("server", &self.server)
            .finish()
    }
}

/// Construct an application and, unless `start` is false, start it.
pub async fn bootstrap(config: AppConfig) -> Result<App, BootstrapError> {
    let start = config.start;
    let mut app = App::new(config)?;
    if start {
        app.start(StartOptions::default()).await?;
    }
    Ok(app)
}
