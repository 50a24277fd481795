//! Registration orchestration.
//!
//! The service loads the registration aggregate, applies one of its pure
//! transitions and persists the result with a version check. The state row and
//! the outbox rows for the emitted events are written in one transaction. On a
//! version conflict the transition is re-applied to a fresh copy, up to
//! `cas_retry_limit` times.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::server::{
    config::RegistrationPolicy,
    data::{
        outbox::OutboxRepository, registration::RegistrationRepository,
        student::StudentRepository, student_group::StudentGroupRepository,
    },
    error::{internal::InternalError, registration::RegistrationError, AppError},
    model::{
        event::RegistrationEvent,
        registration::{
            CompleteOutcome, CompleteRegistrationParams, CompletionProfile, Registration,
            RegistrationStatus, ResendOutcome, VerifyOutcome, VerifyRegistrationParams,
        },
    },
    util::{clock::Clock, code::generate_code, password::PasswordHasher},
};

pub struct RegistrationService<'a> {
    db: &'a DatabaseConnection,
    policy: &'a RegistrationPolicy,
    clock: &'a dyn Clock,
    hasher: &'a PasswordHasher,
}

impl<'a> RegistrationService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        policy: &'a RegistrationPolicy,
        clock: &'a dyn Clock,
        hasher: &'a PasswordHasher,
    ) -> Self {
        Self {
            db,
            policy,
            clock,
            hasher,
        }
    }

    /// Starts a registration for an email and queues the verification mail.
    ///
    /// A lapsed registration still holding the email is expired first. Concurrent
    /// starts for one email are decided by the unique `active_email` index.
    ///
    /// # Arguments
    /// - `email` - Normalized email address
    ///
    /// # Returns
    /// - `Ok(Registration)` - The new pending registration
    /// - `Err(AlreadyRegistered)` - A student or completed registration exists for the email
    /// - `Err(InProgress)` - Another registration for the email is still active
    /// - `Err(Contention)` - Lost every retry while expiring a lapsed registration
    pub async fn start(&self, email: &str) -> Result<Registration, AppError> {
        let registrations = RegistrationRepository::new(self.db);

        for attempt in 0..=self.policy.cas_retry_limit {
            let now = self.clock.now();

            if StudentRepository::new(self.db).exists_by_email(email).await? {
                return Err(RegistrationError::AlreadyRegistered.into());
            }

            if let Some(mut latest) = registrations.find_latest_by_email(email).await? {
                match latest.status {
                    RegistrationStatus::Completed => {
                        return Err(RegistrationError::AlreadyRegistered.into());
                    }
                    RegistrationStatus::Pending | RegistrationStatus::Verified => {
                        let expected = latest.version;
                        if !latest.expire_if_lapsed(now, self.policy) {
                            return Err(RegistrationError::InProgress.into());
                        }
                        if !registrations.update(&latest, expected).await? {
                            tracing::warn!(
                                registration_id = %latest.id,
                                attempt,
                                "Version conflict expiring lapsed registration, retrying"
                            );
                            continue;
                        }
                        tracing::info!(registration_id = %latest.id, "Expired lapsed registration");
                    }
                    RegistrationStatus::Expired => {}
                }
            }

            let code = generate_code(self.policy.code_length);
            let (registration, event) =
                Registration::start(Uuid::new_v4(), email.to_string(), code, now, self.policy);

            let txn = self.db.begin().await?;
            if !RegistrationRepository::new(&txn).insert(&registration).await? {
                txn.rollback().await?;
                return Err(RegistrationError::InProgress.into());
            }
            OutboxRepository::new(&txn).enqueue(&event, now).await?;
            txn.commit().await?;

            tracing::info!(registration_id = %registration.id, "Registration started");

            return Ok(registration);
        }

        Err(RegistrationError::Contention.into())
    }

    /// Checks a verification code.
    ///
    /// Failed attempts are persisted before the error is returned, so the
    /// attempt limit holds across concurrent requests.
    ///
    /// # Returns
    /// - `Ok(Registration)` - Now verified
    /// - `Err(InvalidCode)` - Wrong code, attempts remain
    /// - `Err(AttemptsExhausted)` - Wrong code hit the limit, registration expired
    /// - `Err(CodeExpired)` - Code lapsed, registration expired
    /// - `Err(NotPending)` / `Err(NotFound)` - Nothing to verify
    pub async fn verify(&self, params: VerifyRegistrationParams) -> Result<Registration, AppError> {
        let (registration, outcome) = self
            .transition(&params.email, |registration, now| {
                let outcome = registration.verify(&params.code, now, self.policy)?;
                Ok((outcome, Vec::new()))
            })
            .await?;

        match outcome {
            VerifyOutcome::Verified => {
                tracing::info!(registration_id = %registration.id, "Registration verified");
                Ok(registration)
            }
            VerifyOutcome::WrongCode { remaining } => {
                tracing::warn!(registration_id = %registration.id, remaining, "Invalid verification code");
                Err(RegistrationError::InvalidCode { remaining }.into())
            }
            VerifyOutcome::AttemptsExhausted => {
                tracing::warn!(registration_id = %registration.id, "Verification attempts exhausted");
                Err(RegistrationError::AttemptsExhausted.into())
            }
            VerifyOutcome::CodeExpired => Err(RegistrationError::CodeExpired.into()),
        }
    }

    /// Issues a new verification code and queues it for delivery.
    ///
    /// # Returns
    /// - `Ok(Registration)` - Registration carrying the new code
    /// - `Err(ResendThrottled)` - Cooldown not elapsed, nothing changed
    /// - `Err(NotFound)` - No pending registration, or it lapsed and was expired
    pub async fn resend(&self, email: &str) -> Result<Registration, AppError> {
        let code_length = self.policy.code_length;

        let result = self
            .transition(email, |registration, now| {
                match registration.resend(|| generate_code(code_length), now, self.policy)? {
                    ResendOutcome::Resent(event) => Ok((true, vec![event])),
                    ResendOutcome::Lapsed => Ok((false, Vec::new())),
                }
            })
            .await;

        match result {
            Ok((registration, true)) => {
                tracing::info!(registration_id = %registration.id, "Verification code resent");
                Ok(registration)
            }
            Ok((registration, false)) => {
                tracing::info!(registration_id = %registration.id, "Expired lapsed registration on resend");
                Err(RegistrationError::NotFound.into())
            }
            Err(AppError::RegistrationErr(RegistrationError::ResendThrottled { retry_after_secs })) => {
                tracing::warn!(email, retry_after_secs, "Resend throttled");
                Err(RegistrationError::ResendThrottled { retry_after_secs }.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Completes a verified registration.
    ///
    /// State and code are checked first, then the group and the barcode; the
    /// password is hashed off the async runtime. The student account itself is
    /// created later by the provisioner reacting to the emitted event.
    ///
    /// # Returns
    /// - `Ok(Registration)` - Now completed
    /// - `Err(VerifyFirst)` / `Err(Expired)` / `Err(AlreadyCompleted)` - Wrong state
    /// - `Err(CodeMismatch)` - Code differs from the verified one
    /// - `Err(GroupNotFound)` - Unknown group
    /// - `Err(DuplicateBarcode)` - Barcode already taken
    pub async fn complete(&self, params: CompleteRegistrationParams) -> Result<Registration, AppError> {
        let current = RegistrationRepository::new(self.db)
            .find_latest_by_email(&params.email)
            .await?
            .ok_or(RegistrationError::NotFound)?;
        current.ensure_completable(&params.code, self.clock.now(), self.policy)?;

        if !StudentGroupRepository::new(self.db)
            .exists(params.group_id)
            .await?
        {
            return Err(RegistrationError::GroupNotFound(params.group_id).into());
        }

        if StudentRepository::new(self.db)
            .exists_by_barcode(&params.barcode)
            .await?
            || RegistrationRepository::new(self.db)
                .barcode_claimed(&params.barcode)
                .await?
        {
            return Err(RegistrationError::DuplicateBarcode.into());
        }

        let hasher = *self.hasher;
        let password = params.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| InternalError::BlockingTask(e.to_string()))?;

        let profile = CompletionProfile {
            first_name: params.first_name,
            last_name: params.last_name,
            barcode: params.barcode,
            group_id: params.group_id,
            password_hash,
        };

        let (registration, completed) = self
            .transition(&params.email, |registration, now| {
                match registration.complete(&params.code, profile.clone(), now, self.policy)? {
                    CompleteOutcome::Completed(event) => Ok((true, vec![event])),
                    CompleteOutcome::Lapsed => Ok((false, Vec::new())),
                }
            })
            .await?;

        if !completed {
            tracing::info!(registration_id = %registration.id, "Expired lapsed registration on completion");
            return Err(RegistrationError::Expired.into());
        }

        tracing::info!(registration_id = %registration.id, "Registration completed");

        Ok(registration)
    }

    /// Expires registrations that outlived their deadline, releasing their emails.
    ///
    /// Rows changed concurrently are skipped and picked up by a later sweep.
    ///
    /// # Arguments
    /// - `limit` - Maximum registrations examined per call
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of registrations expired
    pub async fn expire_lapsed(&self, limit: u64) -> Result<usize, AppError> {
        let repo = RegistrationRepository::new(self.db);
        let now = self.clock.now();

        let mut expired = 0;
        for mut registration in repo.find_lapsed(now, self.policy, limit).await? {
            let expected = registration.version;
            if registration.expire_if_lapsed(now, self.policy)
                && repo.update(&registration, expected).await?
            {
                expired += 1;
            }
        }

        if expired > 0 {
            tracing::info!(expired, "Expired lapsed registrations");
        }

        Ok(expired)
    }

    /// Loads the latest registration for `email`, applies `apply` and persists the result.
    ///
    /// Errors returned by `apply` leave the stored row untouched. A version
    /// conflict reloads the row and applies again.
    async fn transition<T>(
        &self,
        email: &str,
        mut apply: impl FnMut(
            &mut Registration,
            DateTime<Utc>,
        ) -> Result<(T, Vec<RegistrationEvent>), RegistrationError>,
    ) -> Result<(Registration, T), AppError> {
        let registrations = RegistrationRepository::new(self.db);

        for attempt in 0..=self.policy.cas_retry_limit {
            let mut registration = registrations
                .find_latest_by_email(email)
                .await?
                .ok_or(RegistrationError::NotFound)?;
            let expected = registration.version;
            let now = self.clock.now();

            let (value, events) = apply(&mut registration, now)?;

            if self.persist(&registration, expected, &events, now).await? {
                return Ok((registration, value));
            }

            tracing::warn!(registration_id = %registration.id, attempt, "Version conflict, retrying");
        }

        Err(RegistrationError::Contention.into())
    }

    /// Writes the registration and its events atomically.
    ///
    /// # Returns
    /// - `Ok(true)` - Committed
    /// - `Ok(false)` - Version conflict, nothing written
    async fn persist(
        &self,
        registration: &Registration,
        expected_version: i32,
        events: &[RegistrationEvent],
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;

        if !RegistrationRepository::new(&txn)
            .update(registration, expected_version)
            .await?
        {
            txn.rollback().await?;
            return Ok(false);
        }

        let outbox = OutboxRepository::new(&txn);
        for event in events {
            outbox.enqueue(event, now).await?;
        }

        txn.commit().await?;

        Ok(true)
    }
}
