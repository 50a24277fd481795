use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{api::ErrorDto, group::StudentGroupDto},
    server::{error::AppError, service::group::StudentGroupService, state::AppState},
};

/// Tag for grouping student group endpoints in OpenAPI documentation
pub static GROUP_TAG: &str = "group";

/// List student groups.
///
/// Returns every group a registrant can pick when completing registration.
///
/// # Returns
/// - `200 OK` - Groups ordered by name
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/groups",
    tag = GROUP_TAG,
    responses(
        (status = 200, description = "Student groups", body = Vec<StudentGroupDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_groups(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let groups = StudentGroupService::new(&state.db).get_all().await?;

    let dtos: Vec<StudentGroupDto> = groups.into_iter().map(|g| g.into_dto()).collect();

    Ok((StatusCode::OK, Json(dtos)))
}
