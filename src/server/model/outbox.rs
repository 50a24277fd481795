//! Outbox message domain model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::server::{
    error::{internal::InternalError, AppError},
    model::event::RegistrationEvent,
    util::parse::parse_uuid_from_string,
};

/// An event waiting in (or already relayed from) the outbox.
///
/// The payload stays encoded until the relay decodes it, so one corrupt row
/// cannot fail a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxMessage {
    pub id: i32,
    pub aggregate_id: Uuid,
    pub event_type: String,
    pub payload: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub available_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl OutboxMessage {
    pub fn from_entity(entity: entity::outbox_event::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            aggregate_id: parse_uuid_from_string(entity.aggregate_id)?,
            event_type: entity.event_type,
            payload: entity.payload,
            attempts: entity.attempts,
            last_error: entity.last_error,
            available_at: entity.available_at,
            published_at: entity.published_at,
        })
    }

    /// Decodes the JSON payload.
    pub fn event(&self) -> Result<RegistrationEvent, AppError> {
        serde_json::from_str(&self.payload).map_err(|e| InternalError::EventPayload(e).into())
    }
}
