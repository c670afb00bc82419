//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by route, status
//! - `relay_request_duration_seconds` (histogram): latency by route
//! - `relay_upstream_requests_total` (counter): upstream calls by service, outcome
//! - `relay_fallbacks_total` (counter): synthesized table parts by kind

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed client request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call outcome ("ok" or "error").
pub fn record_upstream(service: &'static str, outcome: &'static str) {
    metrics::counter!(
        "relay_upstream_requests_total",
        "service" => service,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a synthesized table part ("headers" or "rows").
pub fn record_fallback(kind: &'static str) {
    metrics::counter!("relay_fallbacks_total", "kind" => kind).increment(1);
}
