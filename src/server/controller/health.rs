use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    model::api::ErrorDto,
    server::{error::AppError, state::AppState},
};

/// Liveness check that also pings the database.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database reachable"),
        (status = 500, description = "Database unreachable", body = ErrorDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.db.ping().await?;

    Ok(StatusCode::OK)
}
