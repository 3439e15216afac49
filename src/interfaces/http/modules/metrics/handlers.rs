//! Prometheus scrape endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`, Prometheus text exposition format
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

/// Register descriptions for the user counters so they show up with HELP
/// lines once the recorder is installed.
pub fn describe_user_metrics() {
    metrics::describe_counter!("users_created_total", "Users inserted into the store");
    metrics::describe_counter!("users_deleted_total", "Users removed by OIB");
    metrics::describe_counter!(
        "export_files_generated_total",
        "Export files written to the export directory"
    );
    metrics::describe_counter!("http_requests_total", "HTTP requests by method, route and status");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency by method and route"
    );
}
