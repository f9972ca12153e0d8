//! Route composition.
//!
//! # Responsibilities
//! - Build each route's view chain once
//! - Resolve and construct one controller per step
//! - Produce a router with one GET endpoint per mount path
//!
//! # Design Decisions
//! - Fail fast: a controller that cannot be constructed aborts the
//!   whole composition, no route is partially mounted
//! - A MountedRoute is immutable; requests share it through Arc

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Path;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;

use crate::config::validation::{ValidatedConfig, ValidatedRoute, ValidatedStep};
use crate::controllers::{self, Controller, ControllerError, ControllerOptions, ControllerSource, StepRequest};
use crate::observability::metrics;
use crate::views::{ViewEngine, ViewResolutionChain};

/// Path under which static assets are served; exposed to templates.
pub const ASSET_PATH: &str = "/public";

/// Error raised when a step's controller cannot be constructed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to construct controller {controller} for step {step} of {route}: {source}")]
pub struct ComposeError {
    pub route: String,
    pub step: String,
    pub controller: String,
    #[source]
    pub source: ControllerError,
}

/// A composed route, ready to be attached to the pipeline.
pub struct MountedRoute {
    pub label: String,
    pub base_url: String,
    pub views: Arc<ViewResolutionChain>,
    pub steps: Vec<Arc<MountedStep>>,
}

/// One step with its constructed controller.
pub struct MountedStep {
    pub route: String,
    pub step: String,
    pub paths: Vec<crate::routing::matcher::MountPath>,
    pub source: ControllerSource,
    controller: Arc<dyn Controller>,
}

impl MountedStep {
    /// Hand a request to the controller and record the outcome.
    async fn dispatch(&self, uri: Uri, params: HashMap<String, String>) -> Response {
        let start = Instant::now();
        let request = StepRequest {
            path: uri.path().to_string(),
            params,
        };

        let response = match self.controller.get(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    route = %self.route,
                    step = %self.step,
                    path = %uri.path(),
                    error = %e,
                    "Step failed"
                );
                e.into_response()
            }
        };

        metrics::record_step(&self.route, &self.step, response.status().as_u16(), start);
        response
    }
}

impl MountedRoute {
    /// Router with every mount path of every step.
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for step in &self.steps {
            for mount in &step.paths {
                router = router.route(&mount.path, step_endpoint(step.clone(), mount.has_params));
            }
        }
        router
    }
}

impl std::fmt::Debug for MountedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedRoute")
            .field("label", &self.label)
            .field("base_url", &self.base_url)
            .field("views", &self.views.to_string())
            .field("steps", &self.steps.iter().map(|s| s.step.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

fn step_endpoint(step: Arc<MountedStep>, has_params: bool) -> MethodRouter {
    if has_params {
        get(move |Path(params): Path<HashMap<String, String>>, uri: Uri| {
            let step = step.clone();
            async move { step.dispatch(uri, params).await }
        })
    } else {
        get(move |uri: Uri| {
            let step = step.clone();
            async move { step.dispatch(uri, HashMap::new()).await }
        })
    }
}

/// Locals shared by every render under `base_url`.
pub fn base_locals(app: &ValidatedConfig, base_url: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut locals = serde_json::Map::new();
    locals.insert("assetPath".into(), ASSET_PATH.into());
    locals.insert("baseUrl".into(), base_url.into());
    if let Some(tag) = &app.config.ga_tag_id {
        locals.insert("gaTagId".into(), tag.clone().into());
    }
    locals
}

/// Compose one route.
pub fn compose_route(
    route: &ValidatedRoute,
    app: &ValidatedConfig,
    engine: &Arc<ViewEngine>,
) -> Result<MountedRoute, ComposeError> {
    let label = route.label();
    let views = Arc::new(ViewResolutionChain::for_route(route, app));
    let locals = base_locals(app, &route.base_url);

    tracing::debug!(route = %label, views = %views, "View chain resolved");

    let mut steps = Vec::with_capacity(route.steps.len());
    for step in &route.steps {
        steps.push(Arc::new(compose_step(route, step, app, &label, &views, &locals, engine)?));
    }

    Ok(MountedRoute {
        label,
        base_url: route.base_url.clone(),
        views,
        steps,
    })
}

fn compose_step(
    route: &ValidatedRoute,
    step: &ValidatedStep,
    app: &ValidatedConfig,
    label: &str,
    views: &Arc<ViewResolutionChain>,
    locals: &serde_json::Map<String, serde_json::Value>,
    engine: &Arc<ViewEngine>,
) -> Result<MountedStep, ComposeError> {
    let options = ControllerOptions {
        route: step.path.clone(),
        template: step.template(),
        fields: route.fields.clone(),
        views: views.clone(),
        engine: engine.clone(),
        app_config: app.config.app_config.clone(),
        locals: locals.clone(),
    };

    let binding = controllers::resolve(&step.config, &route.config, &app.config, options);
    let controller_name = binding.factory.name().to_string();
    let source = binding.source;

    let controller = binding.construct().map_err(|source| ComposeError {
        route: label.to_string(),
        step: step.path.clone(),
        controller: controller_name.clone(),
        source,
    })?;

    tracing::debug!(
        route = %label,
        step = %step.path,
        controller = %controller_name,
        source = %source,
        paths = ?step.mount_paths.iter().map(|m| m.path.as_str()).collect::<Vec<_>>(),
        "Step mounted"
    );

    Ok(MountedStep {
        route: label.to_string(),
        step: step.path.clone(),
        paths: step.mount_paths.clone(),
        source,
        controller,
    })
}

/// Compose every route in configuration order.
pub fn compose_all(
    app: &ValidatedConfig,
    engine: &Arc<ViewEngine>,
) -> Result<Vec<MountedRoute>, ComposeError> {
    app.routes
        .iter()
        .map(|route| compose_route(route, app, engine))
        .collect()
}
