//! Metrics collection and exposition.
//!
//! # Metrics
//! - `app_requests_total` (counter): requests by method, path, status
//! - `app_request_duration_seconds` (histogram): latency distribution
//! - `flag_refresh_total` (counter): refresh attempts by outcome
//! - `flag_refresh_duration_seconds` (histogram): provider fetch latency
//! - `flag_client_state` (gauge): 0=uninitialized, 1=ready, 2=error
//!
//! # Design Decisions
//! - Updates are unconditional and cheap; with no exporter installed the
//!   macros are no-ops, so the library never depends on the endpoint
//! - The exporter runs on its own listener, separate from the service port

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::flags::FlagState;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one handled HTTP request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("app_requests_total", &labels).increment(1);
    metrics::histogram!("app_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record one flag refresh attempt.
pub fn record_refresh(success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("flag_refresh_total", "outcome" => outcome).increment(1);
    metrics::histogram!("flag_refresh_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record the flag client's lifecycle state.
pub fn record_flag_state(state: FlagState) {
    metrics::gauge!("flag_client_state").set(state as u8 as f64);
}
