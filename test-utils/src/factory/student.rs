//! Student factory.
//!
//! Seeds already-provisioned student accounts, e.g. to exercise barcode and
//! email uniqueness checks.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating test students.
pub struct StudentFactory<'a> {
    db: &'a DatabaseConnection,
    group_id: i32,
    email: String,
    barcode: String,
    first_name: String,
    last_name: String,
}

impl<'a> StudentFactory<'a> {
    /// Creates a new factory for a student in the given group.
    ///
    /// Defaults:
    /// - email: `"student{id}@test.com"`
    /// - barcode: `"BC{id}"`
    pub fn new(db: &'a DatabaseConnection, group_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            group_id,
            email: format!("student{}@test.com", id),
            barcode: format!("BC{}", id),
            first_name: "Test".to_string(),
            last_name: format!("Student {}", id),
        }
    }

    /// Sets the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the barcode.
    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = barcode.into();
        self
    }

    /// Builds and inserts the student.
    ///
    /// # Returns
    /// - `Ok(entity::student::Model)` - Created student
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::student::Model, DbErr> {
        entity::student::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            email: ActiveValue::Set(self.email),
            barcode: ActiveValue::Set(self.barcode),
            first_name: ActiveValue::Set(self.first_name),
            last_name: ActiveValue::Set(self.last_name),
            group_id: ActiveValue::Set(self.group_id),
            password_hash: ActiveValue::Set("pbkdf2-sha256$1$00$00".to_string()),
            registration_id: ActiveValue::Set(Uuid::new_v4().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a student with default values in the given group.
pub async fn create_student(
    db: &DatabaseConnection,
    group_id: i32,
) -> Result<entity::student::Model, DbErr> {
    StudentFactory::new(db, group_id).build().await
}
