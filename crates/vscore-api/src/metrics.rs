//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vscore_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vscore_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vscore_http_requests_in_flight";

    // Scoring metrics
    pub const BATCHES_SCORED_TOTAL: &str = "vscore_batches_scored_total";
    pub const BATCH_SIZE: &str = "vscore_batch_size";
    pub const SCORING_DURATION_SECONDS: &str = "vscore_scoring_duration_seconds";
    pub const SUSTAINED_VIDEOS_TOTAL: &str = "vscore_sustained_videos_total";
    pub const SCORING_FAILURES_TOTAL: &str = "vscore_scoring_failures_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vscore_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a successfully scored batch.
pub fn record_batch_scored(size: usize, sustained: usize, duration_secs: f64) {
    counter!(names::BATCHES_SCORED_TOTAL).increment(1);
    histogram!(names::BATCH_SIZE).record(size as f64);
    histogram!(names::SCORING_DURATION_SECONDS).record(duration_secs);
    counter!(names::SUSTAINED_VIDEOS_TOTAL).increment(sustained as u64);
}

/// Record a batch that failed to score.
pub fn record_scoring_failure(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::SCORING_FAILURES_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", route_label(endpoint).to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Map a request path to a bounded label set.
fn route_label(path: &str) -> &str {
    match path {
        "/api/analyze" | "/health" | "/healthz" | "/metrics" => path,
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
