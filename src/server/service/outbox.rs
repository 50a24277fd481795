//! Outbox relay.
//!
//! Delivers committed events to their consumers: verification mails go to the
//! `Mailer`, completions go to the `StudentProvisioner`. Delivery is
//! at-least-once; a failed event is retried with exponential backoff until it
//! reaches `max_attempts`, after which it stays unpublished for inspection.

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::OutboxSettings,
    data::outbox::OutboxRepository,
    error::AppError,
    model::{event::RegistrationEvent, outbox::OutboxMessage},
    service::{
        notification::{MailMessage, Mailer},
        provisioning::StudentProvisioner,
    },
    util::clock::Clock,
};

const BASE_BACKOFF_SECS: i64 = 5;
const MAX_BACKOFF_SECS: i64 = 3600;

/// Outcome of one relay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub published: usize,
    pub failed: usize,
}

pub struct OutboxRelay<'a> {
    db: &'a DatabaseConnection,
    mailer: &'a dyn Mailer,
    clock: &'a dyn Clock,
    settings: &'a OutboxSettings,
}

impl<'a> OutboxRelay<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        mailer: &'a dyn Mailer,
        clock: &'a dyn Clock,
        settings: &'a OutboxSettings,
    ) -> Self {
        Self {
            db,
            mailer,
            clock,
            settings,
        }
    }

    /// Relays one batch of due events.
    ///
    /// A failing event does not stop the batch; only database errors while
    /// reading or bookkeeping abort the run.
    ///
    /// # Returns
    /// - `Ok(RelayReport)` - Counts of published and failed events
    /// - `Err(AppError::DbErr)` - Outbox could not be read or updated
    pub async fn relay_due(&self) -> Result<RelayReport, AppError> {
        let repo = OutboxRepository::new(self.db);
        let now = self.clock.now();

        let due = repo
            .fetch_due(now, self.settings.max_attempts, self.settings.batch_size)
            .await?;

        let mut report = RelayReport::default();
        for message in due {
            match self.dispatch(&message, now).await {
                Ok(()) => {
                    repo.mark_published(message.id, now).await?;
                    report.published += 1;
                }
                Err(e) => {
                    let attempts = message.attempts + 1;
                    repo.mark_failed(message.id, attempts, &e.to_string(), now + backoff(attempts))
                        .await?;
                    report.failed += 1;

                    if attempts >= self.settings.max_attempts {
                        tracing::error!(
                            event_id = message.id,
                            event_type = %message.event_type,
                            attempts,
                            "Giving up on outbox event: {}",
                            e
                        );
                    } else {
                        tracing::warn!(
                            event_id = message.id,
                            event_type = %message.event_type,
                            attempts,
                            "Failed to relay outbox event: {}",
                            e
                        );
                    }
                }
            }
        }

        if report.published > 0 || report.failed > 0 {
            tracing::debug!(published = report.published, failed = report.failed, "Outbox relay run");
        }

        Ok(report)
    }

    async fn dispatch(&self, message: &OutboxMessage, now: DateTime<Utc>) -> Result<(), AppError> {
        let event = message.event()?;

        match &event {
            RegistrationEvent::RegistrationStarted { .. }
            | RegistrationEvent::VerificationCodeResent { .. } => {
                if let Some(mail) = MailMessage::from_event(&event) {
                    self.mailer.send(mail).await?;
                }
            }
            RegistrationEvent::StudentRegistrationCompleted { .. } => {
                StudentProvisioner::new(self.db).handle(&event, now).await?;
            }
        }

        Ok(())
    }
}

/// Delay before the next attempt after `attempts` failures.
fn backoff(attempts: i32) -> Duration {
    let exponent = (attempts - 1).clamp(0, 20) as u32;
    let secs = BASE_BACKOFF_SECS.saturating_mul(1_i64 << exponent);
    Duration::seconds(secs.min(MAX_BACKOFF_SECS))
}
