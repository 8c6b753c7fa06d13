//! Login handler

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::auth::{create_token, credentials_match, ADMIN_ROLE};
use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::dto::ValidatedJson;
use crate::{error::ApiError, AppState};

/// Exchanges the admin credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if state.config.insecure_defaults().contains(&"admin_password") {
        warn!("Admin password is the development default; do not use in production");
    }

    if !credentials_match(&state.config, &request.username, &request.password) {
        warn!(username = %request.username, "Rejected login");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = create_token(
        &request.username,
        ADMIN_ROLE,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    info!(username = %request.username, "Issued access token");
    Ok(Json(TokenResponse::bearer(token)))
}
