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
    pub const HTTP_REQUESTS_TOTAL: &str = "vgif_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vgif_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vgif_http_requests_in_flight";

    // Conversion metrics
    pub const CONVERSIONS_TOTAL: &str = "vgif_conversions_total";
    pub const UPLOAD_BYTES: &str = "vgif_upload_bytes";
    pub const CLEANUP_DELETIONS_TOTAL: &str = "vgif_cleanup_deletions_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of a conversion attempt.
pub fn record_conversion(outcome: &'static str) {
    counter!(names::CONVERSIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record the size of a persisted upload.
pub fn record_upload_bytes(bytes: usize) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Collapse paths to the routes we serve so unknown URLs share one label.
fn sanitize_path(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/upload" => "/upload",
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        _ => "/*",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/upload"), "/upload");
        assert_eq!(sanitize_path("/"), "/");
        assert_eq!(sanitize_path("/favicon.ico"), "/*");
        assert_eq!(sanitize_path("/upload/extra"), "/*");
    }
}
