//! API middleware

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::metrics::HttpMetrics;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware
///
/// Logs method, path, status and latency of every request together with the
/// request id assigned by `SetRequestIdLayer`, and records the request in
/// the Prometheus counter and histogram. Metrics are labelled with the route
/// template (`/schools/:id`) when one matched.
pub async fn request_log_middleware(
    State(metrics): State<HttpMetrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let latency_ms = elapsed.as_millis() as u64;
    let status = response.status();

    metrics.observe(method.as_str(), &route, status.as_u16(), elapsed);

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "API request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "API request"
        );
    }

    response
}
