//! Student group factory.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test student groups.
pub struct StudentGroupFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
}

impl<'a> StudentGroupFactory<'a> {
    /// Creates a new factory with a unique default name `"GROUP-{id}"`.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("GROUP-{}", next_id()),
        }
    }

    /// Sets the group name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds and inserts the group.
    ///
    /// # Returns
    /// - `Ok(entity::student_group::Model)` - Created group
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::student_group::Model, DbErr> {
        entity::student_group::ActiveModel {
            name: ActiveValue::Set(self.name),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a group with default values.
pub async fn create_group(
    db: &DatabaseConnection,
) -> Result<entity::student_group::Model, DbErr> {
    StudentGroupFactory::new(db).build().await
}
