use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{group, health, registration},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Coursehub registration API"),
    tags(
        (name = "registration", description = "Student self-registration"),
        (name = "group", description = "Student groups"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// Builds the API router with Swagger UI served at `/api/docs`.
pub fn router() -> Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(registration::start_registration))
        .routes(routes!(registration::verify_registration))
        .routes(routes!(registration::resend_code))
        .routes(routes!(registration::complete_registration))
        .routes(routes!(group::get_groups))
        .routes(routes!(health::health))
        .split_for_parts();

    router.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
