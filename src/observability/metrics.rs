//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_auth_rejections_total` (counter): failed authentications by reason
//! - `gateway_panics_total` (counter): panics caught by the recovery stage
//! - `gateway_template_reloads_total` (counter): cache rebuilds by outcome
//! - `gateway_templates_loaded` (gauge): pages in the current cache
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus exporter.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_auth_rejection(reason: &'static str) {
    counter!("gateway_auth_rejections_total", "reason" => reason).increment(1);
}

pub fn record_panic() {
    counter!("gateway_panics_total").increment(1);
}

pub fn record_template_reload(success: bool, pages: usize) {
    let outcome = if success { "success" } else { "failure" };
    counter!("gateway_template_reloads_total", "outcome" => outcome).increment(1);
    gauge!("gateway_templates_loaded").set(pages as f64);
}
