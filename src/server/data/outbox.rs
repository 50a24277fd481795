//! Outbox data repository.
//!
//! Events are enqueued inside the transaction of the state change that produced
//! them and later read back by the relay. Rows are never deleted; relayed events
//! keep their `published_at` timestamp.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::server::{
    error::{internal::InternalError, AppError},
    model::{event::RegistrationEvent, outbox::OutboxMessage},
};

/// Repository providing database operations for the transactional outbox.
pub struct OutboxRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OutboxRepository<'a, C> {
    /// Creates a new OutboxRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends an event to the outbox, immediately available for relay.
    ///
    /// # Arguments
    /// - `event` - Event to encode as the JSON payload
    /// - `now` - Creation and availability timestamp
    ///
    /// # Returns
    /// - `Ok(())` - Event stored
    /// - `Err(AppError::InternalErr)` - Event failed to serialize
    /// - `Err(AppError::DbErr)` - Database error during insert
    pub async fn enqueue(&self, event: &RegistrationEvent, now: DateTime<Utc>) -> Result<(), AppError> {
        let payload = serde_json::to_string(event).map_err(InternalError::EventPayload)?;

        entity::prelude::OutboxEvent::insert(entity::outbox_event::ActiveModel {
            aggregate_id: ActiveValue::Set(event.registration_id().to_string()),
            event_type: ActiveValue::Set(event.event_type().to_string()),
            payload: ActiveValue::Set(payload),
            attempts: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            available_at: ActiveValue::Set(now),
            published_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// Fetches unpublished events that are due for delivery, oldest first.
    ///
    /// Events that already failed `max_attempts` times are parked and skipped.
    ///
    /// # Arguments
    /// - `now` - Current time, compared against `available_at`
    /// - `max_attempts` - Attempt count at which events stop being retried
    /// - `limit` - Maximum number of events returned
    pub async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
        limit: u64,
    ) -> Result<Vec<OutboxMessage>, AppError> {
        let entities = entity::prelude::OutboxEvent::find()
            .filter(entity::outbox_event::Column::PublishedAt.is_null())
            .filter(entity::outbox_event::Column::AvailableAt.lte(now))
            .filter(entity::outbox_event::Column::Attempts.lt(max_attempts))
            .order_by_asc(entity::outbox_event::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        entities.into_iter().map(OutboxMessage::from_entity).collect()
    }

    /// Fetches every event recorded for a registration, oldest first.
    pub async fn find_by_aggregate(&self, aggregate_id: Uuid) -> Result<Vec<OutboxMessage>, AppError> {
        let entities = entity::prelude::OutboxEvent::find()
            .filter(entity::outbox_event::Column::AggregateId.eq(aggregate_id.to_string()))
            .order_by_asc(entity::outbox_event::Column::Id)
            .all(self.db)
            .await?;

        entities.into_iter().map(OutboxMessage::from_entity).collect()
    }

    /// Marks an event as delivered.
    pub async fn mark_published(&self, id: i32, now: DateTime<Utc>) -> Result<(), AppError> {
        entity::prelude::OutboxEvent::update_many()
            .filter(entity::outbox_event::Column::Id.eq(id))
            .col_expr(entity::outbox_event::Column::PublishedAt, Expr::value(now))
            .col_expr(entity::outbox_event::Column::LastError, Expr::value(Option::<String>::None))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Records a failed delivery attempt and schedules the next one.
    ///
    /// # Arguments
    /// - `id` - Outbox event ID
    /// - `attempts` - Total attempts made so far, including this one
    /// - `error` - Failure message kept for inspection
    /// - `next_attempt_at` - When the event becomes due again
    pub async fn mark_failed(
        &self,
        id: i32,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::OutboxEvent::update_many()
            .filter(entity::outbox_event::Column::Id.eq(id))
            .col_expr(entity::outbox_event::Column::Attempts, Expr::value(attempts))
            .col_expr(entity::outbox_event::Column::LastError, Expr::value(error.to_string()))
            .col_expr(entity::outbox_event::Column::AvailableAt, Expr::value(next_attempt_at))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
