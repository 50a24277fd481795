//! Domain events emitted by registration transitions.
//!
//! Events are serialized into the outbox with an internal `type` tag and relayed
//! to the mailer and the student provisioner after the transition commits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistrationEvent {
    RegistrationStarted {
        registration_id: Uuid,
        email: String,
        verification_code: String,
    },
    VerificationCodeResent {
        registration_id: Uuid,
        email: String,
        verification_code: String,
    },
    StudentRegistrationCompleted {
        registration_id: Uuid,
        email: String,
        barcode: String,
        first_name: String,
        last_name: String,
        group_id: i32,
        password_hash: String,
    },
}

impl RegistrationEvent {
    /// Stable event name stored in `outbox_event.event_type`.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RegistrationStarted { .. } => "RegistrationStarted",
            Self::VerificationCodeResent { .. } => "VerificationCodeResent",
            Self::StudentRegistrationCompleted { .. } => "StudentRegistrationCompleted",
        }
    }

    pub fn registration_id(&self) -> Uuid {
        match self {
            Self::RegistrationStarted {
                registration_id, ..
            }
            | Self::VerificationCodeResent {
                registration_id, ..
            }
            | Self::StudentRegistrationCompleted {
                registration_id, ..
            } => *registration_id,
        }
    }
}
