//! Statement handlers

use axum::{
    extract::{Path, State},
    Json,
};
use core_kernel::{SchoolId, StudentId};
use domain_billing::{SchoolStatement, StudentStatement};

use crate::{error::ApiError, AppState};

/// Builds a student's statement
pub async fn student_statement(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<StudentStatement>, ApiError> {
    Ok(Json(state.service.get_student_statement(id).await?))
}

/// Builds a school's statement
pub async fn school_statement(
    State(state): State<AppState>,
    Path(id): Path<SchoolId>,
) -> Result<Json<SchoolStatement>, ApiError> {
    Ok(Json(state.service.get_school_statement(id).await?))
}
