//! Metrics collection and exposition.
//!
//! # Metrics
//! - `product_search_requests_total` (counter): inbound requests by method, status
//! - `product_search_request_duration_seconds` (histogram): inbound latency
//! - `product_search_upstream_requests_total` (counter): catalog calls by outcome
//! - `product_search_upstream_duration_seconds` (histogram): catalog latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "product_search_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("product_search_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record one catalog call. `outcome` is `"ok"` or an error kind.
pub fn record_upstream(outcome: &'static str, start: Instant) {
    metrics::counter!("product_search_upstream_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("product_search_upstream_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
