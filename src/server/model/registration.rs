//! Registration aggregate and its state machine.
//!
//! States move `Pending → {Verified, Expired}` and `Verified → {Completed, Expired}`;
//! `Expired` and `Completed` are terminal. Every transition is a pure, synchronous
//! method on `Registration` that bumps `version`; persisting the result with a
//! version check is the service's job.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use std::str::FromStr;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{
    model::registration::{CompleteRegistrationDto, RegistrationDto, VerifyRegistrationDto},
    server::{
        config::RegistrationPolicy,
        error::{internal::InternalError, registration::RegistrationError, AppError},
        model::event::RegistrationEvent,
        util::{code::normalize_code, parse::parse_uuid_from_string, validate},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Pending,
    Verified,
    Completed,
    Expired,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Active registrations hold the email's single in-flight slot.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Verified)
    }
}

impl FromStr for RegistrationStatus {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            other => Err(InternalError::UnknownStatus(other.to_string())),
        }
    }
}

/// Result of a verification attempt that was applied to the aggregate.
///
/// Every variant mutates the registration and must be persisted, including
/// the failing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    WrongCode { remaining: u32 },
    AttemptsExhausted,
    CodeExpired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    Resent(RegistrationEvent),
    /// The code had lapsed; the registration was expired instead.
    Lapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    Completed(RegistrationEvent),
    /// The completion window had passed; the registration was expired instead.
    Lapsed,
}

/// Validated student profile submitted at completion, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionProfile {
    pub first_name: String,
    pub last_name: String,
    pub barcode: String,
    pub group_id: i32,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub id: Uuid,
    pub email: String,
    pub status: RegistrationStatus,
    pub verification_code: String,
    pub code_attempts: u32,
    pub code_expires_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub barcode: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Creates a fresh pending registration and its `RegistrationStarted` event.
    pub fn start(
        id: Uuid,
        email: String,
        verification_code: String,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
    ) -> (Self, RegistrationEvent) {
        let registration = Self {
            id,
            email,
            status: RegistrationStatus::Pending,
            verification_code,
            code_attempts: 0,
            code_expires_at: now + policy.code_ttl,
            resend_available_at: now + policy.resend_cooldown,
            verified_at: None,
            completed_at: None,
            barcode: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let event = RegistrationEvent::RegistrationStarted {
            registration_id: registration.id,
            email: registration.email.clone(),
            verification_code: registration.verification_code.clone(),
        };

        (registration, event)
    }

    /// Value stored in the unique `active_email` column.
    pub fn active_email(&self) -> Option<&str> {
        self.status.is_active().then_some(self.email.as_str())
    }

    /// Whether an active registration has outlived its deadline.
    ///
    /// Pending registrations lapse when the code expires, verified ones when the
    /// completion window closes.
    pub fn is_lapsed(&self, now: DateTime<Utc>, policy: &RegistrationPolicy) -> bool {
        match self.status {
            RegistrationStatus::Pending => now >= self.code_expires_at,
            RegistrationStatus::Verified => self
                .verified_at
                .map(|at| now >= at + policy.completion_window)
                .unwrap_or(false),
            RegistrationStatus::Completed | RegistrationStatus::Expired => false,
        }
    }

    /// Expires the registration if it has lapsed. Returns whether it did.
    pub fn expire_if_lapsed(&mut self, now: DateTime<Utc>, policy: &RegistrationPolicy) -> bool {
        if self.is_lapsed(now, policy) {
            self.expire(now);
            true
        } else {
            false
        }
    }

    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.status = RegistrationStatus::Expired;
        self.touch(now);
    }

    /// Checks a submitted code.
    ///
    /// # Returns
    /// - `Ok(VerifyOutcome)` - The attempt was applied and must be persisted
    /// - `Err(RegistrationError::NotPending)` - Nothing changed
    pub fn verify(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
    ) -> Result<VerifyOutcome, RegistrationError> {
        if self.status != RegistrationStatus::Pending {
            return Err(RegistrationError::NotPending);
        }

        if self.expire_if_lapsed(now, policy) {
            return Ok(VerifyOutcome::CodeExpired);
        }

        if self.code_matches(code) {
            self.status = RegistrationStatus::Verified;
            self.verified_at = Some(now);
            self.touch(now);
            return Ok(VerifyOutcome::Verified);
        }

        self.code_attempts = (self.code_attempts + 1).min(policy.max_code_attempts);
        if self.code_attempts >= policy.max_code_attempts {
            self.expire(now);
            return Ok(VerifyOutcome::AttemptsExhausted);
        }

        self.touch(now);
        Ok(VerifyOutcome::WrongCode {
            remaining: policy.max_code_attempts - self.code_attempts,
        })
    }

    /// Issues a new code drawn from `next_code`, distinct from the current one.
    ///
    /// # Returns
    /// - `Ok(ResendOutcome)` - Applied, must be persisted
    /// - `Err(RegistrationError::NotFound)` - Registration is not pending
    /// - `Err(RegistrationError::ResendThrottled)` - Cooldown has not elapsed
    pub fn resend(
        &mut self,
        mut next_code: impl FnMut() -> String,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
    ) -> Result<ResendOutcome, RegistrationError> {
        if self.status != RegistrationStatus::Pending {
            return Err(RegistrationError::NotFound);
        }

        if self.expire_if_lapsed(now, policy) {
            return Ok(ResendOutcome::Lapsed);
        }

        if now < self.resend_available_at {
            let remaining_ms = (self.resend_available_at - now).num_milliseconds();
            return Err(RegistrationError::ResendThrottled {
                retry_after_secs: (remaining_ms + 999) / 1000,
            });
        }

        let mut code = next_code();
        while code == self.verification_code {
            code = next_code();
        }

        self.verification_code = code;
        self.code_attempts = 0;
        self.code_expires_at = now + policy.code_ttl;
        self.resend_available_at = now + policy.resend_cooldown;
        self.touch(now);

        Ok(ResendOutcome::Resent(
            RegistrationEvent::VerificationCodeResent {
                registration_id: self.id,
                email: self.email.clone(),
                verification_code: self.verification_code.clone(),
            },
        ))
    }

    /// Completes a verified registration with the submitted profile.
    ///
    /// # Returns
    /// - `Ok(CompleteOutcome)` - Applied, must be persisted
    /// - `Err(RegistrationError::VerifyFirst)` - Still pending
    /// - `Err(RegistrationError::AlreadyCompleted)` - Already completed
    /// - `Err(RegistrationError::Expired)` - Already expired
    /// - `Err(RegistrationError::CodeMismatch)` - Code differs from the verified one
    pub fn complete(
        &mut self,
        code: &str,
        profile: CompletionProfile,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
    ) -> Result<CompleteOutcome, RegistrationError> {
        self.ensure_completable(code, now, policy)?;

        if self.expire_if_lapsed(now, policy) {
            return Ok(CompleteOutcome::Lapsed);
        }

        self.status = RegistrationStatus::Completed;
        self.completed_at = Some(now);
        self.barcode = Some(profile.barcode.clone());
        self.touch(now);

        Ok(CompleteOutcome::Completed(
            RegistrationEvent::StudentRegistrationCompleted {
                registration_id: self.id,
                email: self.email.clone(),
                barcode: profile.barcode,
                first_name: profile.first_name,
                last_name: profile.last_name,
                group_id: profile.group_id,
                password_hash: profile.password_hash,
            },
        ))
    }

    /// Checks everything `complete` checks without changing anything.
    ///
    /// A lapsed registration passes so that `complete` can expire it.
    pub fn ensure_completable(
        &self,
        code: &str,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
    ) -> Result<(), RegistrationError> {
        match self.status {
            RegistrationStatus::Pending => Err(RegistrationError::VerifyFirst),
            RegistrationStatus::Completed => Err(RegistrationError::AlreadyCompleted),
            RegistrationStatus::Expired => Err(RegistrationError::Expired),
            RegistrationStatus::Verified => {
                if !self.is_lapsed(now, policy) && !self.code_matches(code) {
                    return Err(RegistrationError::CodeMismatch);
                }
                Ok(())
            }
        }
    }

    fn code_matches(&self, code: &str) -> bool {
        self.verification_code
            .as_bytes()
            .ct_eq(code.as_bytes())
            .into()
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }

    /// Converts an entity model to the aggregate at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Registration)` - The converted aggregate
    /// - `Err(AppError::InternalErr)` - Stored id is not a UUID or status is unknown
    pub fn from_entity(entity: entity::registration::Model) -> Result<Self, AppError> {
        let id = parse_uuid_from_string(entity.id)?;
        let status = RegistrationStatus::from_str(&entity.status)?;

        Ok(Self {
            id,
            email: entity.email,
            status,
            verification_code: entity.verification_code,
            code_attempts: entity.code_attempts.max(0) as u32,
            code_expires_at: entity.code_expires_at,
            resend_available_at: entity.resend_available_at,
            verified_at: entity.verified_at,
            completed_at: entity.completed_at,
            barcode: entity.barcode,
            version: entity.version,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Builds an active model with every column set.
    pub fn to_active_model(&self) -> entity::registration::ActiveModel {
        entity::registration::ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            email: ActiveValue::Set(self.email.clone()),
            active_email: ActiveValue::Set(self.active_email().map(str::to_string)),
            status: ActiveValue::Set(self.status.as_str().to_string()),
            verification_code: ActiveValue::Set(self.verification_code.clone()),
            code_attempts: ActiveValue::Set(self.code_attempts as i32),
            code_expires_at: ActiveValue::Set(self.code_expires_at),
            resend_available_at: ActiveValue::Set(self.resend_available_at),
            verified_at: ActiveValue::Set(self.verified_at),
            completed_at: ActiveValue::Set(self.completed_at),
            barcode: ActiveValue::Set(self.barcode.clone()),
            version: ActiveValue::Set(self.version),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.updated_at),
        }
    }

    /// Converts the aggregate to a DTO for API responses, leaving out the code.
    pub fn into_dto(self) -> RegistrationDto {
        RegistrationDto {
            id: self.id,
            email: self.email,
            status: self.status.as_str().to_string(),
            code_attempts: self.code_attempts,
            code_expires_at: self.code_expires_at,
            resend_available_at: self.resend_available_at,
            verified_at: self.verified_at,
            completed_at: self.completed_at,
        }
    }
}

/// Parameters for `verify`, normalized from the request body.
#[derive(Debug, Clone)]
pub struct VerifyRegistrationParams {
    pub email: String,
    pub code: String,
}

impl VerifyRegistrationParams {
    pub fn from_dto(dto: VerifyRegistrationDto) -> Result<Self, AppError> {
        validate::require_code(&dto.code)?;

        Ok(Self {
            email: validate::normalize_email(&dto.email)?,
            code: normalize_code(&dto.code),
        })
    }
}

/// Parameters for `complete`, normalized from the request body.
///
/// Holds the plain password until the service hashes it.
#[derive(Debug, Clone)]
pub struct CompleteRegistrationParams {
    pub email: String,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub barcode: String,
    pub group_id: i32,
    pub password: String,
}

impl CompleteRegistrationParams {
    pub fn from_dto(dto: CompleteRegistrationDto) -> Result<Self, AppError> {
        validate::require_code(&dto.code)?;
        validate::require_password(&dto.password)?;

        Ok(Self {
            email: validate::normalize_email(&dto.email)?,
            code: normalize_code(&dto.code),
            first_name: validate::require_name("First name", &dto.first_name)?,
            last_name: validate::require_name("Last name", &dto.last_name)?,
            barcode: validate::normalize_barcode(&dto.barcode)?,
            group_id: dto.group_id,
            password: dto.password,
        })
    }
}
