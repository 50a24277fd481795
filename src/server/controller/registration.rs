use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        registration::{
            CompleteRegistrationDto, CompletedRegistrationDto, RegistrationDto,
            RegistrationEmailDto, VerifyRegistrationDto,
        },
    },
    server::{
        error::AppError,
        model::registration::{CompleteRegistrationParams, VerifyRegistrationParams},
        state::AppState,
        util::validate::normalize_email,
    },
};

/// Tag for grouping registration endpoints in OpenAPI documentation
pub static REGISTRATION_TAG: &str = "registration";

/// Start a registration.
///
/// Creates a pending registration for the email and queues a verification code
/// for delivery. Only one registration per email can be in progress.
///
/// # Arguments
/// - `state` - Application state
/// - `payload` - Email address to register
///
/// # Returns
/// - `201 Created` - Registration started, code queued
/// - `400 Bad Request` - Malformed email
/// - `409 Conflict` - Email already belongs to a student
/// - `429 Too Many Requests` - A registration for the email is already in progress
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = REGISTRATION_TAG,
    request_body = RegistrationEmailDto,
    responses(
        (status = 201, description = "Registration started", body = RegistrationDto),
        (status = 400, description = "Invalid email address", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 429, description = "Registration already in progress", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_registration(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationEmailDto>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&payload.email)?;

    let registration = state.registration_service().start(&email).await?;

    Ok((StatusCode::CREATED, Json(registration.into_dto())))
}

/// Verify a registration's email address.
///
/// # Returns
/// - `200 OK` - Email verified
/// - `400 Bad Request` - Registration not awaiting verification, or malformed input
/// - `404 Not Found` - No registration for the email
/// - `422 Unprocessable Entity` - Wrong code, attempts remain
/// - `429 Too Many Requests` - Attempts exhausted or code expired
#[utoipa::path(
    post,
    path = "/api/registrations/verify",
    tag = REGISTRATION_TAG,
    request_body = VerifyRegistrationDto,
    responses(
        (status = 200, description = "Email verified", body = RegistrationDto),
        (status = 400, description = "Not awaiting verification or invalid input", body = ErrorDto),
        (status = 404, description = "Registration not found", body = ErrorDto),
        (status = 422, description = "Invalid verification code", body = ErrorDto),
        (status = 429, description = "Attempts exhausted or code expired", body = ErrorDto),
        (status = 503, description = "Concurrent modification, retry", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_registration(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRegistrationDto>,
) -> Result<impl IntoResponse, AppError> {
    let params = VerifyRegistrationParams::from_dto(payload)?;

    let registration = state.registration_service().verify(params).await?;

    Ok((StatusCode::OK, Json(registration.into_dto())))
}

/// Send a new verification code.
///
/// Replaces the current code and resets the attempt counter. Limited to one
/// request per cooldown period.
///
/// # Returns
/// - `202 Accepted` - New code queued
/// - `404 Not Found` - No pending registration for the email
/// - `429 Too Many Requests` - Cooldown not elapsed, see `Retry-After`
#[utoipa::path(
    post,
    path = "/api/registrations/resend",
    tag = REGISTRATION_TAG,
    request_body = RegistrationEmailDto,
    responses(
        (status = 202, description = "New code queued", body = RegistrationDto),
        (status = 400, description = "Invalid email address", body = ErrorDto),
        (status = 404, description = "No pending registration", body = ErrorDto),
        (status = 429, description = "Resend throttled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn resend_code(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationEmailDto>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&payload.email)?;

    let registration = state.registration_service().resend(&email).await?;

    Ok((StatusCode::ACCEPTED, Json(registration.into_dto())))
}

/// Complete a verified registration with the student profile.
///
/// The student account is provisioned asynchronously once the completion has
/// been committed.
///
/// # Returns
/// - `200 OK` - Registration completed
/// - `400 Bad Request` - Not verified yet, expired, or malformed input
/// - `404 Not Found` - No registration for the email, or unknown group
/// - `409 Conflict` - Already completed, or barcode taken
/// - `422 Unprocessable Entity` - Code does not match the verified one
#[utoipa::path(
    post,
    path = "/api/registrations/complete",
    tag = REGISTRATION_TAG,
    request_body = CompleteRegistrationDto,
    responses(
        (status = 200, description = "Registration completed", body = CompletedRegistrationDto),
        (status = 400, description = "Verify first, expired or invalid input", body = ErrorDto),
        (status = 404, description = "Registration or group not found", body = ErrorDto),
        (status = 409, description = "Already completed or duplicate barcode", body = ErrorDto),
        (status = 422, description = "Verification code does not match", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn complete_registration(
    State(state): State<AppState>,
    Json(payload): Json<CompleteRegistrationDto>,
) -> Result<impl IntoResponse, AppError> {
    let params = CompleteRegistrationParams::from_dto(payload)?;

    let registration = state.registration_service().complete(params).await?;
    let student_email = registration.email.clone();

    Ok((
        StatusCode::OK,
        Json(CompletedRegistrationDto {
            registration: registration.into_dto(),
            student_email,
        }),
    ))
}
