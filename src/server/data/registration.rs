//! Registration data repository for database operations.
//!
//! Provides the `RegistrationRepository` with insert-if-absent creation and
//! version-checked updates. Both primitives report losing a race as a plain
//! `false` instead of an error so the service can decide how to react.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Condition, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::server::{
    config::RegistrationPolicy,
    data::is_unique_violation,
    error::{registration::RegistrationError, AppError},
    model::registration::{Registration, RegistrationStatus},
};

/// Repository providing database operations for registrations.
pub struct RegistrationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RegistrationRepository<'a, C> {
    /// Creates a new RegistrationRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new registration unless another active one holds its email.
    ///
    /// # Arguments
    /// - `registration` - Freshly started registration
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted
    /// - `Ok(false)` - The unique `active_email` index rejected the row
    /// - `Err(AppError::DbErr)` - Any other database error
    pub async fn insert(&self, registration: &Registration) -> Result<bool, AppError> {
        let result = entity::prelude::Registration::insert(registration.to_active_model())
            .exec_without_returning(self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Finds the current registration for an email.
    ///
    /// The active registration holding the email wins. Only when none is active
    /// does the most recently created terminal registration get returned, so an
    /// expired row sharing a `created_at` with its successor never shadows it.
    ///
    /// # Arguments
    /// - `email` - Normalized email address
    ///
    /// # Returns
    /// - `Ok(Some(Registration))` - Active registration, or the latest terminal one
    /// - `Ok(None)` - The email never registered
    /// - `Err(AppError)` - Database error or corrupt row
    pub async fn find_latest_by_email(&self, email: &str) -> Result<Option<Registration>, AppError> {
        let active = entity::prelude::Registration::find()
            .filter(entity::registration::Column::ActiveEmail.eq(email))
            .one(self.db)
            .await?;

        if let Some(entity) = active {
            return Registration::from_entity(entity).map(Some);
        }

        let entity = entity::prelude::Registration::find()
            .filter(entity::registration::Column::Email.eq(email))
            .order_by_desc(entity::registration::Column::CreatedAt)
            .order_by_desc(entity::registration::Column::Version)
            .one(self.db)
            .await?;

        entity.map(Registration::from_entity).transpose()
    }

    /// Finds a registration by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, AppError> {
        let entity = entity::prelude::Registration::find_by_id(id.to_string())
            .one(self.db)
            .await?;

        entity.map(Registration::from_entity).transpose()
    }

    /// Writes every mutable column if the stored version still equals `expected_version`.
    ///
    /// `active_email` only ever moves from a value to `NULL` on update, so a unique
    /// violation here can only come from the `barcode` index.
    ///
    /// # Arguments
    /// - `registration` - Aggregate after the transition (already carrying the new version)
    /// - `expected_version` - Version the transition was applied to
    ///
    /// # Returns
    /// - `Ok(true)` - Row updated
    /// - `Ok(false)` - Version conflict, another writer got there first
    /// - `Err(AppError::RegistrationErr(DuplicateBarcode))` - Barcode already claimed
    /// - `Err(AppError::DbErr)` - Any other database error
    pub async fn update(
        &self,
        registration: &Registration,
        expected_version: i32,
    ) -> Result<bool, AppError> {
        let mut model = registration.to_active_model();
        model.id = ActiveValue::NotSet;
        model.email = ActiveValue::NotSet;
        model.created_at = ActiveValue::NotSet;

        let result = entity::prelude::Registration::update_many()
            .set(model)
            .filter(entity::registration::Column::Id.eq(registration.id.to_string()))
            .filter(entity::registration::Column::Version.eq(expected_version))
            .exec(self.db)
            .await;

        match result {
            Ok(res) => Ok(res.rows_affected == 1),
            Err(e) if is_unique_violation(&e) => Err(RegistrationError::DuplicateBarcode.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finds active registrations that have outlived their deadline.
    ///
    /// # Arguments
    /// - `now` - Current time
    /// - `policy` - Provides the completion window for verified registrations
    /// - `limit` - Maximum rows returned
    ///
    /// # Returns
    /// - `Ok(Vec<Registration>)` - Lapsed registrations, oldest first
    /// - `Err(AppError)` - Database error or corrupt row
    pub async fn find_lapsed(
        &self,
        now: DateTime<Utc>,
        policy: &RegistrationPolicy,
        limit: u64,
    ) -> Result<Vec<Registration>, AppError> {
        use entity::registration::Column;

        let verified_before = now - policy.completion_window;

        let entities = entity::prelude::Registration::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(RegistrationStatus::Pending.as_str()))
                            .add(Column::CodeExpiresAt.lte(now)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(RegistrationStatus::Verified.as_str()))
                            .add(Column::VerifiedAt.lte(verified_before)),
                    ),
            )
            .order_by_asc(Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?;

        entities.into_iter().map(Registration::from_entity).collect()
    }

    /// Checks whether any registration already claimed a barcode.
    pub async fn barcode_claimed(&self, barcode: &str) -> Result<bool, AppError> {
        let count = entity::prelude::Registration::find()
            .filter(entity::registration::Column::Barcode.eq(barcode))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}
