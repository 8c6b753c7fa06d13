//! Prometheus scrape endpoint

use axum::{extract::State, http::header, response::IntoResponse};

use crate::error::ApiError;
use crate::AppState;

/// Serves the request metrics in the Prometheus text format
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::Internal(format!("failed to encode metrics: {e}")))?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
