//! Student handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::StudentId;
use domain_billing::Student;

use crate::auth::AdminUser;
use crate::dto::student::{NewStudentRequest, UpdateStudentRequest};
use crate::dto::{PageParams, ValidatedJson, ValidatedQuery};
use crate::{error::ApiError, AppState};

/// Creates a student
pub async fn create_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state.service.create_student(request.into()).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Lists students
pub async fn list_students(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.service.list_students(page.into()).await?))
}

/// Gets a student by ID
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.service.get_student(id).await?))
}

/// Updates a student
pub async fn update_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<StudentId>,
    ValidatedJson(request): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.service.update_student(id, request.into()).await?))
}

/// Deletes a student
pub async fn delete_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
