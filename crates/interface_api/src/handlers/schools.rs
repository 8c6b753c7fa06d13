//! School handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::SchoolId;
use domain_billing::{School, Student};

use crate::auth::AdminUser;
use crate::dto::school::{NewSchoolRequest, UpdateSchoolRequest};
use crate::dto::{PageParams, ValidatedJson, ValidatedQuery};
use crate::{error::ApiError, AppState};

/// Creates a school
pub async fn create_school(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<NewSchoolRequest>,
) -> Result<(StatusCode, Json<School>), ApiError> {
    let school = state.service.create_school(request.into()).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

/// Lists schools
pub async fn list_schools(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageParams>,
) -> Result<Json<Vec<School>>, ApiError> {
    Ok(Json(state.service.list_schools(page.into()).await?))
}

/// Gets a school by ID
pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<SchoolId>,
) -> Result<Json<School>, ApiError> {
    Ok(Json(state.service.get_school(id).await?))
}

/// Lists the students of a school
pub async fn list_school_students(
    State(state): State<AppState>,
    Path(id): Path<SchoolId>,
    ValidatedQuery(page): ValidatedQuery<PageParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.service.list_students_by_school(id, page.into()).await?))
}

/// Updates a school
pub async fn update_school(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<SchoolId>,
    ValidatedJson(request): ValidatedJson<UpdateSchoolRequest>,
) -> Result<Json<School>, ApiError> {
    Ok(Json(state.service.update_school(id, request.into()).await?))
}

/// Deletes a school
pub async fn delete_school(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<SchoolId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_school(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
