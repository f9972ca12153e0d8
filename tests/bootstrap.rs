//! End-to-end tests: construct, start, request, stop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::future::BoxFuture;
use journey_bootstrap::{
    bootstrap, App, BaseController, BootstrapError, ConfigError, Controller, ControllerError,
    ControllerFactory, ControllerOptions, Lifecycle, StartOptions, StepConfig, StepRequest, Theme,
};
use journey_bootstrap::controllers::StepError;

mod common;

use common::{config, fixtures, route, views};

#[tokio::test]
async fn rejects_missing_routes_and_steps() {
    let err = bootstrap(config(vec![])).await.unwrap_err();
    assert!(matches!(err, BootstrapError::Config(ConfigError::MissingRoutes)));
    assert_eq!(err.to_string(), "Must be called with a list of routes");

    let err = App::new(config(vec![route(views("app_1"), &[])])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingSteps { route: 0 }));
}

#[tokio::test]
async fn reports_the_resolved_views_path() {
    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.views = Some("not_a_valid_path".into());
    let err = App::new(cfg).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Cannot find views at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[tokio::test]
async fn accepts_route_fields_and_named_fields() {
    let mut r = route(views("app_1"), &["/one"]);
    r.fields = Some("fields".into());
    assert!(App::new(config(vec![r])).is_ok());

    let mut r = route(views("app_1"), &["/one"]);
    r.name = Some("app_1".into());
    let mut cfg = config(vec![r]);
    cfg.fields = Some("apps".into());
    assert!(App::new(cfg).is_ok());
}

#[tokio::test]
async fn starts_and_serves_the_step_view() {
    let mut app = bootstrap(config(vec![route(views("app_1"), &["/one"])])).await.unwrap();
    assert_eq!(app.lifecycle(), Lifecycle::Running);
    let addr = app.local_addr().unwrap();

    let (status, body) = common::get(addr, "/one").await;
    assert_eq!(status, 200);
    assert_eq!(body, "<div>one</div>\n");

    app.stop().await.unwrap();
}

#[tokio::test]
async fn routes_render_their_own_views() {
    let mut app = bootstrap(config(vec![
        route(views("app_1"), &["/one"]),
        route(views("app_2"), &["/two"]),
    ]))
    .await
    .unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/one").await, (200, "<div>one</div>\n".to_string()));
    assert_eq!(common::get(addr, "/two").await, (200, "<div>two</div>\n".to_string()));

    app.stop().await.unwrap();
}

#[tokio::test]
async fn view_chain_precedence() {
    let mut cfg = config(vec![
        route(views("app_2"), &["/common"]),
        {
            let mut r = route(views("app_1"), &["/common", "/step"]);
            r.base_url = Some("/app_1".into());
            r
        },
    ]);
    cfg.views = Some(views("common"));
    let mut app = bootstrap(cfg).await.unwrap();
    let addr = app.local_addr().unwrap();

    // Route directory wins over the shared one.
    let (_, body) = common::get(addr, "/common").await;
    assert_eq!(body, "<div>from app 2</div>\n");

    // Shared directory when the route lacks the template.
    let (_, body) = common::get(addr, "/app_1/common").await;
    assert_eq!(body, "<div>from common</div>\n");

    // Library default when nobody has it.
    let (status, body) = common::get(addr, "/app_1/step").await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"<div class="content">"#));

    app.stop().await.unwrap();
}

#[tokio::test]
async fn root_step_serves_index_under_base_url() {
    let mut r = route(views("app_1"), &["/"]);
    r.base_url = Some("/app_1".into());
    let mut app = bootstrap(config(vec![r])).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/app_1").await, (200, "<div>index</div>\n".to_string()));

    app.stop().await.unwrap();
}

#[tokio::test]
async fn capture_syntax_is_rejected_before_mounting() {
    let err = App::new(config(vec![route(views("app_1"), &["/:id"])])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidStepPath { .. }));

    let mut with_action = route(views("app_1"), &["/one"]);
    with_action.params = Some("/:action?".into());
    let mut with_id = route(views("app_1"), &["/"]);
    with_id.base_url = Some("/one".into());
    with_id.params = Some("/:id".into());
    let err = App::new(config(vec![with_action, with_id])).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateMountPath { first: 0, second: 1, .. }));
}

#[tokio::test]
async fn base_url_and_params() {
    let mut prefixed = route(views("app_1"), &["/one"]);
    prefixed.base_url = Some("/app_1".into());
    let mut with_params = route(views("app_1"), &["/locals"]);
    with_params.params = Some("/:action?".into());

    let mut app = bootstrap(config(vec![prefixed, with_params])).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/app_1/one").await.1, "<div>one</div>\n");
    assert_eq!(common::get(addr, "/one").await.0, 404);
    assert_eq!(common::get(addr, "/locals").await.1, "<div>/one </div>\n");
    assert_eq!(common::get(addr, "/locals/param").await.1, "<div>/one param</div>\n");

    app.stop().await.unwrap();
}

#[tokio::test]
async fn app_base_controller_builds_every_step() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut cfg = config(vec![route(views("app_1"), &["/one", "/step"])]);
    cfg.base_controller = Some(ControllerFactory::new("CustomBase", move |options| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(BaseController::new(options))
    }));

    let mut app = bootstrap(cfg).await.unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);

    let (status, _) = common::get(app.local_addr().unwrap(), "/one").await;
    assert_eq!(status, 200);
    app.stop().await.unwrap();
}

/// Wraps the default controller, recording the options it was built from.
struct Recording {
    inner: BaseController,
    hits: Arc<AtomicUsize>,
}

impl Controller for Recording {
    fn get(&self, request: StepRequest) -> BoxFuture<'_, Result<Response, StepError>> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.inner.get(request)
    }
}

#[tokio::test]
async fn step_controller_receives_app_config() {
    let seen: Arc<Mutex<Option<ControllerOptions>>> = Arc::new(Mutex::new(None));
    let hits = Arc::new(AtomicUsize::new(0));
    let (seen_in, hits_in) = (seen.clone(), hits.clone());

    let step_controller = ControllerFactory::new("CustomStep", move |options: ControllerOptions| {
        *seen_in.lock().unwrap() = Some(options.clone());
        Ok(Recording {
            inner: BaseController::new(options),
            hits: hits_in.clone(),
        })
    });

    let mut r = route(views("app_1"), &["/one", "/step"]);
    r.steps.insert(
        "/one".into(),
        StepConfig {
            controller: Some(step_controller),
            ..Default::default()
        },
    );
    let mut cfg = config(vec![r]);
    cfg.app_config = serde_json::json!({ "foo": "bar", "bar": "baz" });
    cfg.base_controller = Some(ControllerFactory::base());

    let mut app = bootstrap(cfg).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/one").await.1, "<div>one</div>\n");
    assert_eq!(common::get(addr, "/step").await.0, 200);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let options = seen.lock().unwrap().clone().unwrap();
    assert_eq!(options.app_config, serde_json::json!({ "foo": "bar", "bar": "baz" }));
    assert_eq!(options.route, "/one");
    assert_eq!(options.views.len(), 2);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn failing_controller_aborts_start() {
    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.start = false;
    cfg.base_controller = Some(ControllerFactory::new("Broken", |_options| {
        Err::<BaseController, _>(ControllerError::new("cannot connect"))
    }));

    let mut app = bootstrap(cfg).await.unwrap();
    let err = app.start(StartOptions::default()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::ControllerConstruction(_)));
    assert!(app.server().is_none());
    assert_eq!(app.lifecycle(), Lifecycle::Created);
}

#[tokio::test]
async fn deferred_start_with_overrides() {
    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.start = false;
    cfg.host = "192.0.2.1".into();
    cfg.port = 1;

    let mut app = bootstrap(cfg).await.unwrap();
    assert!(app.server().is_none());
    assert_eq!(app.lifecycle(), Lifecycle::Created);

    let started = app
        .start(StartOptions::default().host("127.0.0.1").port(0))
        .await
        .unwrap();
    assert!(started);
    assert_eq!(app.config().config.host, "127.0.0.1");

    let (status, body) = common::get(app.local_addr().unwrap(), "/one").await;
    assert_eq!((status, body.as_str()), (200, "<div>one</div>\n"));

    app.stop().await.unwrap();
}

#[tokio::test]
async fn second_start_is_a_no_op() {
    let mut app = bootstrap(config(vec![route(views("app_1"), &["/one"])])).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert!(!app.start(StartOptions::default()).await.unwrap());
    assert_eq!(app.local_addr(), Some(addr));
    assert_eq!(common::get(addr, "/one").await.0, 200);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn stop_refuses_new_connections() {
    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.timeouts.shutdown_drain_secs = 1;
    let mut app = bootstrap(cfg).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert!(app.stop().await.unwrap());
    assert_eq!(app.lifecycle(), Lifecycle::Stopped);
    assert!(app.server().is_none());

    let err = common::client()
        .get(format!("http://{}/one", addr))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_connect(), "expected connection refused, got {err}");

    // Stopping again is harmless.
    assert!(!app.stop().await.unwrap());
}

#[tokio::test]
async fn stop_drains_in_flight_requests() {
    let entered = Arc::new(tokio::sync::Notify::new());
    let signal = entered.clone();

    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.start = false;
    cfg.timeouts.shutdown_drain_secs = 5;
    let mut app = App::new(cfg).unwrap();
    app.use_handler(Router::new().route(
        "/slow",
        get(move || {
            let signal = signal.clone();
            async move {
                signal.notify_one();
                tokio::time::sleep(Duration::from_millis(300)).await;
                "done"
            }
        }),
    ));
    app.start(StartOptions::default()).await.unwrap();
    let addr = app.local_addr().unwrap();

    let in_flight = tokio::spawn(common::get(addr, "/slow"));
    entered.notified().await;
    assert!(app.server().unwrap().connection_count() >= 1);

    assert!(app.stop().await.unwrap());
    assert_eq!(in_flight.await.unwrap(), (200, "done".to_string()));

    let err = common::client()
        .get(format!("http://{}/one", addr))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_connect(), "expected connection refused, got {err}");
}

#[tokio::test]
async fn restart_after_stop() {
    let mut app = bootstrap(config(vec![route(views("app_1"), &["/one"])])).await.unwrap();
    app.stop().await.unwrap();

    assert!(app.start(StartOptions::default()).await.unwrap());
    assert_eq!(app.lifecycle(), Lifecycle::Running);
    assert_eq!(common::get(app.local_addr().unwrap(), "/one").await.0, 200);
    app.stop().await.unwrap();
}

#[tokio::test]
async fn health_and_static_assets() {
    let mut app = bootstrap(config(vec![route(views("app_1"), &["/one"])])).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/healthz/ping").await.0, 200);
    assert_eq!(common::get(addr, "/public/test.js").await.0, 200);
    assert_eq!(common::get(addr, "/public/not-here.js").await.0, 404);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn handlers_and_readiness_run_before_binding() {
    let ready = Arc::new(AtomicBool::new(false));
    let flag = ready.clone();

    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.start = false;
    let mut app = App::new(cfg).unwrap();
    app.use_handler(Router::new().route("/custom", get(|| async { "custom" })))
        .on_ready(async move {
            tokio::task::yield_now().await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

    app.start(StartOptions::default()).await.unwrap();
    assert!(ready.load(Ordering::SeqCst));

    let addr = app.local_addr().unwrap();
    assert_eq!(common::get(addr, "/custom").await, (200, "custom".to_string()));
    assert_eq!(common::get(addr, "/cookies").await.0, 200);
    assert_eq!(common::get(addr, "/terms-and-conditions").await.0, 200);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn failed_readiness_blocks_start() {
    let mut cfg = config(vec![route(views("app_1"), &["/one"])]);
    cfg.start = false;
    let mut app = App::new(cfg).unwrap();
    app.on_ready(async { Err("translations unavailable".into()) });

    let err = app
        .start(StartOptions::default().host("localhost").port(8443))
        .await
        .unwrap_err();
    assert!(matches!(err, BootstrapError::Readiness(_)));
    assert!(app.server().is_none());

    // Overrides of a failed start are not kept.
    assert_eq!(app.config().config.host, "127.0.0.1");
    assert_eq!(app.config().config.port, 0);
}

#[derive(Debug)]
struct FixtureTheme;

impl Theme for FixtureTheme {
    fn views(&self) -> Vec<PathBuf> {
        vec![fixtures().join("theme/views")]
    }
}

#[tokio::test]
async fn theme_views_replace_the_built_in_partials() {
    let mut cfg = config(vec![route(views("app_1"), &["/one", "/step"])]);
    cfg.theme = Some(Arc::new(FixtureTheme));
    let mut app = bootstrap(cfg).await.unwrap();
    let addr = app.local_addr().unwrap();

    assert_eq!(common::get(addr, "/one").await.1, "<div>one</div>\n");
    assert_eq!(common::get(addr, "/step").await.1, "<div>themed</div>\n");

    app.stop().await.unwrap();
}
