//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wiretap_events_captured_total` (counter): envelopes delivered to the
//!   collector
//! - `wiretap_events_dropped_total` (counter): delivery attempts abandoned
//!
//! # Design Decisions
//! - Counters only; the tap adds no timing instrumentation to the hot path
//! - Exposition is optional and off by default; when disabled the counter
//!   macros record into a no-op recorder

use std::net::SocketAddr;

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Envelopes delivered to the collector.
pub const EVENTS_CAPTURED: &str = "wiretap_events_captured_total";

/// Delivery attempts abandoned (collector absent, slow, or unreachable).
pub const EVENTS_DROPPED: &str = "wiretap_events_dropped_total";

/// Install the Prometheus exporter on `addr` and describe the tap's metrics.
///
/// Failure to install is logged, never fatal: metrics are an ambient
/// concern, not part of the tap's contract.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(EVENTS_CAPTURED, "Envelopes delivered to the collector");
            describe_counter!(EVENTS_DROPPED, "Capture delivery attempts abandoned");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}
