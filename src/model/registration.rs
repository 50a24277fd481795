use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/registrations` and `POST /api/registrations/resend`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationEmailDto {
    pub email: String,
}

/// Body of `POST /api/registrations/verify`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyRegistrationDto {
    pub email: String,
    pub code: String,
}

/// Body of `POST /api/registrations/complete`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteRegistrationDto {
    pub email: String,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub barcode: String,
    pub group_id: i32,
    pub password: String,
}

/// Registration state as seen by the registrant. The verification code is
/// never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationDto {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    pub code_attempts: u32,
    pub code_expires_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response of `POST /api/registrations/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompletedRegistrationDto {
    pub registration: RegistrationDto,
    /// Login of the student account that will be provisioned.
    pub student_email: String,
}
