//! Metrics collection and exposition.
//!
//! # Metrics
//! - `journey_step_requests_total` (counter): renders by route, step, status
//! - `journey_step_duration_seconds` (histogram): controller latency
//! - `journey_app_running` (gauge): 1 while the listener accepts connections
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled step request.
pub fn record_step(route: &str, step: &str, status: u16, start: Instant) {
    counter!(
        "journey_step_requests_total",
        "route" => route.to_string(),
        "step" => step.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "journey_step_duration_seconds",
        "route" => route.to_string(),
        "step" => step.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a lifecycle transition of the listener.
pub fn record_running(running: bool) {
    gauge!("journey_app_running").set(if running { 1.0 } else { 0.0 });
}
