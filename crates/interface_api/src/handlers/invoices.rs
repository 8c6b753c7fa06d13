//! Invoice handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::InvoiceId;
use domain_billing::{Invoice, Payment};

use crate::auth::AdminUser;
use crate::dto::invoice::{NewInvoiceRequest, UpdateInvoiceRequest};
use crate::dto::{PageParams, ValidatedJson, ValidatedQuery};
use crate::{error::ApiError, AppState};

/// Issues an invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<NewInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = state.service.create_invoice(request.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Lists invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageParams>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(state.service.list_invoices(page.into()).await?))
}

/// Gets an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.service.get_invoice(id).await?))
}

/// Lists the payments recorded against an invoice
pub async fn list_invoice_payments(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(state.service.list_invoice_payments(id).await?))
}

/// Updates an invoice
pub async fn update_invoice(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<InvoiceId>,
    ValidatedJson(request): ValidatedJson<UpdateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.service.update_invoice(id, request.into()).await?))
}

/// Deletes an invoice
pub async fn delete_invoice(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<InvoiceId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
