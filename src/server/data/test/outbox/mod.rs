use crate::server::{
    data::outbox::OutboxRepository, error::AppError, model::event::RegistrationEvent,
};
use chrono::{Duration, Utc};
use test_utils::builder::TestBuilder;
use uuid::Uuid;

mod enqueue;
mod fetch_due;

fn started_event(registration_id: Uuid) -> RegistrationEvent {
    RegistrationEvent::RegistrationStarted {
        registration_id,
        email: "a@test.com".to_string(),
        verification_code: "ABC123".to_string(),
    }
}
