//! Handler pipeline assembly.
//!
//! # Responsibilities
//! - Order every pipeline entry: health, static assets, theme hook,
//!   user handlers, readiness-dependent pages, journey routes, 404
//! - Wire up whole-pipeline middleware (request id, timeout, body limit,
//!   request logging)
//!
//! # Design Decisions
//! - Entries are chained through fallbacks: an entry is consulted only
//!   when every earlier entry has no route for the path
//! - Assembly is cheap and repeatable; composition (controller
//!   construction) happens elsewhere, exactly once

use std::sync::Arc;
use std::time::Duration;

use axum::response::{Html, IntoResponse};
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::{
    limit::RequestBodyLimitLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::validation::ValidatedConfig;
use crate::controllers::StepError;
use crate::health;
use crate::http::{request, response};
use crate::observability::logging;
use crate::routing::composer::{base_locals, MountedRoute, ASSET_PATH};
use crate::views::{ViewEngine, ViewResolutionChain};

pub const COOKIES_PATH: &str = "/cookies";
pub const TERMS_PATH: &str = "/terms-and-conditions";

/// Inputs of one pipeline assembly.
pub struct Pipeline<'a> {
    pub app: &'a ValidatedConfig,
    /// Routers added through `App::use_handler`, in insertion order.
    pub handlers: &'a [Router],
    /// Pages mounted once readiness gates resolved.
    pub pages: Option<Router>,
    pub routes: &'a [MountedRoute],
}

impl Pipeline<'_> {
    /// Assemble the final router.
    #[allow(deprecated)]
    pub fn build(self) -> Router {
        let config = &self.app.config;

        let mut tail = self
            .routes
            .iter()
            .fold(Router::new(), |acc, route| acc.merge(route.router()))
            .fallback(response::not_found);

        if let Some(pages) = self.pages {
            tail = pages.fallback_service(tail);
        }
        for handler in self.handlers.iter().rev() {
            tail = handler.clone().fallback_service(tail);
        }

        let mut head = health::router().nest_service(ASSET_PATH, ServeDir::new(&self.app.public));
        if let Some(theme) = &config.theme {
            head = theme.setup(head);
        }

        let mut router = head
            .fallback_service(tail)
            .layer(RequestBodyLimitLayer::new(config.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        router = request::with_request_id(router);

        if logging::request_logging_enabled(&config.env) {
            router = router.layer(TraceLayer::new_for_http());
        }
        router
    }
}

/// Application-level pages that depend on readiness (cookies, terms).
pub fn pages_router(app: &ValidatedConfig, engine: &Arc<ViewEngine>) -> Router {
    let chain = Arc::new(ViewResolutionChain::for_app(app));
    let locals = Arc::new(serde_json::Value::Object(base_locals(app, "")));

    let mut router = Router::new();
    if app.config.get_cookies {
        router = router.route(COOKIES_PATH, page("cookies", engine, &chain, &locals));
    }
    if app.config.get_terms {
        router = router.route(TERMS_PATH, page("terms", engine, &chain, &locals));
    }
    router
}

fn page(
    template: &'static str,
    engine: &Arc<ViewEngine>,
    chain: &Arc<ViewResolutionChain>,
    locals: &Arc<serde_json::Value>,
) -> MethodRouter {
    let engine = engine.clone();
    let chain = chain.clone();
    let locals = locals.clone();
    get(move || {
        let engine = engine.clone();
        let chain = chain.clone();
        let locals = locals.clone();
        async move {
            match engine.render(&chain, template, &locals).await {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!(template, error = %e, "Page failed");
                    StepError::from(e).into_response()
                }
            }
        }
    })
}
