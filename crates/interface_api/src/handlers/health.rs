//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: None,
    })
}

/// Readiness check against the billing store
pub async fn database_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let result = state.service.health_check().await;

    if result.is_healthy() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                message: None,
            }),
        )
    } else {
        tracing::warn!(adapter = %result.adapter_id, message = ?result.message, "Store unhealthy");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
                message: result.message,
            }),
        )
    }
}
