//! Authentication and authorization
//!
//! A single admin account, configured through `ApiConfig`, exchanges its
//! credentials for a signed JWT. Write endpoints take an [`AdminUser`]
//! argument, which rejects the request unless it carries a valid bearer
//! token with the `admin` role.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::AppState;

/// Role granted to the configured administrator
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Granted role
    pub role: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token could not be signed")]
    Signing,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::TokenExpired => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Signing => ApiError::Internal(err.to_string()),
        }
    }
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `subject` - Username the token is issued to
/// * `role` - Role carried by the token
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    subject: &str,
    role: &str,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(AuthError::Signing)?;

    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Signing)
}

/// Validates a JWT token
///
/// # Arguments
///
/// * `token` - The JWT token to validate
/// * `secret` - JWT secret key
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks a login attempt against the configured admin account
///
/// Both comparisons always run to completion so the response time does not
/// reveal which field was wrong or how much of it matched.
pub fn credentials_match(config: &ApiConfig, username: &str, password: &str) -> bool {
    let user_ok = constant_time_eq(username.as_bytes(), config.admin_username.as_bytes());
    let pass_ok = constant_time_eq(password.as_bytes(), config.admin_password.as_bytes());
    user_ok & pass_ok
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = a.len() ^ b.len();
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor for an authenticated administrator
///
/// Missing or invalid tokens are rejected with 401, tokens for any other
/// role with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl AdminUser {
    /// Returns the username the token was issued to
    pub fn username(&self) -> &str {
        &self.0.sub
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let claims = validate_token(token, &state.config.jwt_secret).map_err(|e| {
            warn!(error = %e, "Token validation failed");
            ApiError::from(e)
        })?;

        if claims.role != ADMIN_ROLE {
            warn!(user = %claims.sub, role = %claims.role, "Admin role required");
            return Err(ApiError::Forbidden("Not enough permissions".to_string()));
        }

        Ok(AdminUser(claims))
    }
}
