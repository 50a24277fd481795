//! Outbound registrant notifications.
//!
//! The `Mailer` trait is the seam between the outbox relay and whatever actually
//! delivers mail. The bundled `LogMailer` only logs; deployments plug in a real
//! transport.

use async_trait::async_trait;

use crate::server::{error::mail::MailError, model::event::RegistrationEvent};

/// A message addressed to a registrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Builds the verification mail for events that carry a code.
    ///
    /// Returns `None` for events that do not notify the registrant.
    pub fn from_event(event: &RegistrationEvent) -> Option<Self> {
        match event {
            RegistrationEvent::RegistrationStarted {
                email,
                verification_code,
                ..
            } => Some(Self {
                to: email.clone(),
                subject: "Confirm your email".to_string(),
                body: format!("Your verification code is {verification_code}."),
            }),
            RegistrationEvent::VerificationCodeResent {
                email,
                verification_code,
                ..
            } => Some(Self {
                to: email.clone(),
                subject: "Your new verification code".to_string(),
                body: format!(
                    "Your new verification code is {verification_code}. Previous codes no longer work."
                ),
            }),
            RegistrationEvent::StudentRegistrationCompleted { .. } => None,
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mailer that writes messages to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Sending mail");
        tracing::debug!(body = %message.body);
        Ok(())
    }
}

/// Mailer that keeps every message it was asked to send.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<MailMessage>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Mailer whose transport is always down.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingMailer;

#[cfg(test)]
#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: MailMessage) -> Result<(), MailError> {
        Err(MailError("connection refused".to_string()))
    }
}
