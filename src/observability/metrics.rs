//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): inbound requests by route, status
//! - `proxy_request_duration_seconds` (histogram): inbound latency by route
//! - `proxy_upstream_requests_total` (counter): upstream fetches by outcome
//! - `proxy_upstream_duration_seconds` (histogram): upstream latency
//! - `proxy_features_total` (counter): features emitted
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("proxy_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(outcome: &'static str, start: Instant) {
    counter!("proxy_upstream_requests_total", "outcome" => outcome).increment(1);
    histogram!("proxy_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_features(count: usize) {
    counter!("proxy_features_total").increment(count as u64);
}
