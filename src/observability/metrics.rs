//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_connect_attempts_total` (counter): broker connection attempts by result
//! - `bridge_messages_total` (counter): deliveries received, by queue
//! - `bridge_dispatches_total` (counter): webhook dispatches, by queue and result
//!
//! # Design Decisions
//! - Counters only; updates are cheap atomic increments
//! - Recording is unconditional; without an installed exporter the calls
//!   are no-ops

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one broker connection attempt.
pub fn record_connect_attempt(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("bridge_connect_attempts_total", "result" => result).increment(1);
}

/// Record one delivery received from a queue.
pub fn record_message(queue: &str) {
    metrics::counter!("bridge_messages_total", "queue" => queue.to_string()).increment(1);
}

/// Record one dispatch outcome for a queue.
pub fn record_dispatch(queue: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(
        "bridge_dispatches_total",
        "queue" => queue.to_string(),
        "result" => result
    )
    .increment(1);
}
