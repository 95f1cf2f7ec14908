//! Metrics collection and exposition.
//!
//! # Metrics
//! - `leads_submitted_total` (counter): stored leads by source
//! - `leads_rejected_total` (counter): rejected submissions by reason
//! - `rate_limited_total` (counter): requests refused by the limiter
//! - `rate_limit_tracked_clients` (gauge): live windows after a sweep
//! - `http_requests_total` (counter): requests by route, method, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_lead_submitted(source: &str) {
    counter!("leads_submitted_total", "source" => source.to_string()).increment(1);
}

pub fn record_lead_rejected(reason: &'static str) {
    counter!("leads_rejected_total", "reason" => reason).increment(1);
}

pub fn record_rate_limited() {
    counter!("rate_limited_total").increment(1);
}

pub fn record_tracked_clients(count: usize) {
    gauge!("rate_limit_tracked_clients").set(count as f64);
}

pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    let labels = [
        ("route", route.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}
