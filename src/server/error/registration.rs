//! Business-rule failures of the registration state machine.
//!
//! Every variant maps to a stable `(kind, message)` pair so callers can tell a
//! rule violation ("already registered") from a malformed request.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Coarse classification of registration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    RateLimited,
    InvalidState,
    InvalidCode,
    Contention,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// No registration exists for the email address.
    #[error("Registration not found")]
    NotFound,

    /// A student account or completed registration already exists for the email.
    #[error("A student with this email is already registered")]
    AlreadyRegistered,

    /// Another registration for the email is pending or verified.
    #[error("A registration for this email is already in progress")]
    InProgress,

    /// The registration was already completed; completion is not idempotent.
    #[error("Registration has already been completed")]
    AlreadyCompleted,

    /// Another student or completed registration holds the barcode.
    #[error("A student with this barcode already exists")]
    DuplicateBarcode,

    /// The group referenced by the profile does not exist.
    #[error("Group {0} not found")]
    GroupNotFound(i32),

    /// Wrong verification code, more attempts remain.
    #[error("Invalid verification code, {remaining} attempt(s) remaining")]
    InvalidCode {
        /// Attempts left before the registration expires
        remaining: u32,
    },

    /// The code given at completion does not match the verified code.
    #[error("Verification code does not match")]
    CodeMismatch,

    /// The failed attempt reached the limit and expired the registration.
    #[error("Too many invalid verification attempts, please register again")]
    AttemptsExhausted,

    /// The verification code lapsed before it was used.
    #[error("Verification code has expired, please register again")]
    CodeExpired,

    /// Resend requested before the cooldown elapsed.
    #[error("Please wait {retry_after_secs} second(s) before requesting a new code")]
    ResendThrottled {
        /// Seconds until a resend is accepted
        retry_after_secs: i64,
    },

    /// Completion attempted before the email was verified.
    #[error("Please verify your email first")]
    VerifyFirst,

    /// Verification attempted on a registration that is not pending.
    #[error("Registration is not awaiting verification")]
    NotPending,

    /// The registration expired and must be started again.
    #[error("Registration has expired, please register again")]
    Expired,

    /// Optimistic concurrency retries were exhausted.
    #[error("Registration is being modified concurrently, please retry")]
    Contention,
}

impl RegistrationError {
    /// Returns the error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound | Self::GroupNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyRegistered | Self::AlreadyCompleted | Self::DuplicateBarcode => {
                ErrorKind::Conflict
            }
            Self::InProgress
            | Self::AttemptsExhausted
            | Self::CodeExpired
            | Self::ResendThrottled { .. } => ErrorKind::RateLimited,
            Self::VerifyFirst | Self::NotPending | Self::Expired => ErrorKind::InvalidState,
            Self::InvalidCode { .. } | Self::CodeMismatch => ErrorKind::InvalidCode,
            Self::Contention => ErrorKind::Contention,
        }
    }

    /// HTTP status code for the error's kind.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Contention => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Converts registration errors into HTTP responses.
///
/// The body carries the variant's message. Throttled resends also set a
/// `Retry-After` header.
impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = match &self {
            Self::ResendThrottled { retry_after_secs } => Some((*retry_after_secs).max(1)),
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response();

        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
