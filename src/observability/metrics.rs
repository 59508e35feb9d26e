//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, backend
//! - `router_request_duration_seconds` (histogram): end-to-end latency
//! - `router_readiness_wait_seconds` (histogram): time spent in the gate
//! - `router_readiness_timeouts_total` (counter): gate failures by backend
//!
//! # Design Decisions
//! - Exposed on a dedicated listener, separate from proxy traffic
//! - Labels are low-cardinality: backend instance names are bounded by
//!   the instance count

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint.
///
/// Failure to bind is logged, not fatal: the router serves traffic
/// without metrics rather than refusing to start.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("backend", backend.to_string()),
    ];
    metrics::counter!("router_requests_total", &labels).increment(1);
    metrics::histogram!("router_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record time spent waiting in the readiness gate.
pub fn record_readiness_wait(backend: &str, start: Instant) {
    let labels = [("backend", backend.to_string())];
    metrics::histogram!("router_readiness_wait_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a readiness gate timeout.
pub fn record_readiness_timeout(backend: &str) {
    let labels = [("backend", backend.to_string())];
    metrics::counter!("router_readiness_timeouts_total", &labels).increment(1);
}
