//! Payment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::PaymentId;
use domain_billing::Payment;

use crate::auth::AdminUser;
use crate::dto::payment::{NewPaymentRequest, UpdatePaymentRequest};
use crate::dto::{PageParams, ValidatedJson, ValidatedQuery};
use crate::{error::ApiError, AppState};

/// Records a payment
pub async fn create_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<NewPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = state.service.create_payment(request.into()).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Lists payments
pub async fn list_payments(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageParams>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(state.service.list_payments(page.into()).await?))
}

/// Gets a payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.service.get_payment(id).await?))
}

/// Updates a payment
pub async fn update_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<PaymentId>,
    ValidatedJson(request): ValidatedJson<UpdatePaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.service.update_payment(id, request.into()).await?))
}

/// Deletes a payment
pub async fn delete_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<PaymentId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
