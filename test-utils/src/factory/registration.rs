//! Registration factory.
//!
//! Inserts registration rows directly, bypassing the state machine, so tests can
//! start from any status (e.g. an already expired or completed registration).

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating registration rows with customizable fields.
pub struct RegistrationFactory<'a> {
    db: &'a DatabaseConnection,
    email: String,
    status: String,
    verification_code: String,
    code_attempts: i32,
    created_at: DateTime<Utc>,
    code_expires_at: DateTime<Utc>,
    resend_available_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
    barcode: Option<String>,
    version: i32,
}

impl<'a> RegistrationFactory<'a> {
    /// Creates a new factory for a fresh pending registration.
    ///
    /// Defaults:
    /// - email: `"registrant{id}@test.com"`
    /// - status: `"pending"`
    /// - verification_code: `"ABC123"`
    /// - code expires 15 minutes from now, resend available immediately
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let now = Utc::now();
        Self {
            db,
            email: format!("registrant{}@test.com", next_id()),
            status: "pending".to_string(),
            verification_code: "ABC123".to_string(),
            code_attempts: 0,
            created_at: now,
            code_expires_at: now + Duration::minutes(15),
            resend_available_at: now,
            verified_at: None,
            barcode: None,
            version: 1,
        }
    }

    /// Sets the (already normalized) email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the status string (`pending`, `verified`, `completed`, `expired`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the verification code.
    pub fn verification_code(mut self, code: impl Into<String>) -> Self {
        self.verification_code = code.into();
        self
    }

    /// Sets the failed attempt counter.
    pub fn code_attempts(mut self, attempts: i32) -> Self {
        self.code_attempts = attempts;
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the code expiry timestamp.
    pub fn code_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.code_expires_at = expires_at;
        self
    }

    /// Sets the earliest resend timestamp.
    pub fn resend_available_at(mut self, available_at: DateTime<Utc>) -> Self {
        self.resend_available_at = available_at;
        self
    }

    /// Sets the verification timestamp.
    pub fn verified_at(mut self, verified_at: DateTime<Utc>) -> Self {
        self.verified_at = Some(verified_at);
        self
    }

    /// Sets the claimed barcode.
    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// Sets the optimistic-concurrency version.
    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Builds and inserts the registration.
    ///
    /// `active_email` is derived from the status the same way the application
    /// derives it.
    ///
    /// # Returns
    /// - `Ok(entity::registration::Model)` - Created registration
    /// - `Err(DbErr)` - Database error during insert (e.g. active email taken)
    pub async fn build(self) -> Result<entity::registration::Model, DbErr> {
        let active = matches!(self.status.as_str(), "pending" | "verified");
        let completed_at = (self.status == "completed").then_some(self.created_at);

        entity::registration::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            email: ActiveValue::Set(self.email.clone()),
            active_email: ActiveValue::Set(active.then_some(self.email)),
            status: ActiveValue::Set(self.status),
            verification_code: ActiveValue::Set(self.verification_code),
            code_attempts: ActiveValue::Set(self.code_attempts),
            code_expires_at: ActiveValue::Set(self.code_expires_at),
            resend_available_at: ActiveValue::Set(self.resend_available_at),
            verified_at: ActiveValue::Set(self.verified_at),
            completed_at: ActiveValue::Set(completed_at),
            barcode: ActiveValue::Set(self.barcode),
            version: ActiveValue::Set(self.version),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending registration with default values.
pub async fn create_registration(
    db: &DatabaseConnection,
) -> Result<entity::registration::Model, DbErr> {
    RegistrationFactory::new(db).build().await
}
