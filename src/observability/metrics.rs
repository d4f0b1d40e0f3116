//! Metrics collection and exposition.
//!
//! # Metrics
//! - `restkit_client_outcomes_total` (counter): dispatched client calls by
//!   method and outcome class
//! - `restkit_cors_decisions_total` (counter): CORS before-phase decisions
//!
//! # Design Decisions
//! - Label values are bounded: method names and fixed class strings
//! - The Prometheus exporter is opt-in and owned by the binary

use std::net::SocketAddr;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

pub const CLIENT_OUTCOMES_TOTAL: &str = "restkit_client_outcomes_total";
pub const CORS_DECISIONS_TOTAL: &str = "restkit_cors_decisions_total";

/// Count one dispatched client call.
pub fn record_client_outcome(method: &Method, class: &'static str) {
    metrics::counter!(
        CLIENT_OUTCOMES_TOTAL,
        "method" => method.as_str().to_string(),
        "class" => class
    )
    .increment(1);
}

/// Count one CORS before-phase decision.
pub fn record_cors_decision(decision: &'static str) {
    metrics::counter!(CORS_DECISIONS_TOTAL, "decision" => decision).increment(1);
}

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
