//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define API and updater metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by endpoint, status
//! - `api_request_duration_seconds` (histogram): latency by endpoint
//! - `updater_runs_total` (counter): reload runs by outcome
//! - `updater_documents_ingested_total` (counter): documents inserted by reloads
//! - `updater_files_failed_total` (counter): source files that failed to ingest
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Exporter is opt-in through `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::updater::UpdateReport;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "api_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a reload run.
pub fn record_reload(report: &UpdateReport) {
    let outcome = if report.success { "success" } else { "failure" };
    metrics::counter!("updater_runs_total", "outcome" => outcome).increment(1);
    metrics::counter!("updater_documents_ingested_total").increment(report.inserted() as u64);
    metrics::counter!("updater_files_failed_total").increment(report.failed_files().count() as u64);
}
