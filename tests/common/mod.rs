//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use journey_bootstrap::{AppConfig, RouteConfig, StepConfig};

/// Root of the on-disk fixtures (views, fields, public assets).
pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Absolute path of an app's views directory.
pub fn views(app: &str) -> PathBuf {
    fixtures().join("apps").join(app).join("views")
}

/// A route with default step settings.
pub fn route(views: PathBuf, steps: &[&str]) -> RouteConfig {
    RouteConfig {
        views: Some(views),
        steps: steps
            .iter()
            .map(|s| (s.to_string(), StepConfig::default()))
            .collect(),
        ..Default::default()
    }
}

/// Config bound to an ephemeral loopback port.
pub fn config(routes: Vec<RouteConfig>) -> AppConfig {
    AppConfig {
        root: Some(fixtures()),
        host: "127.0.0.1".into(),
        port: 0,
        env: "test".into(),
        routes,
        ..Default::default()
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// GET `path` and return status and body.
pub async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let res = client()
        .get(format!("http://{}{}", addr, path))
        .send()
        .await
        .expect("server unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}
