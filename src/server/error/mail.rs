use thiserror::Error;

/// Failure reported by a `Mailer` transport.
///
/// The outbox relay records the message on the event and retries later.
#[derive(Error, Debug)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);
