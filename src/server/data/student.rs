//! Student data repository for database operations.
//!
//! Students are only ever created by the provisioner reacting to completed
//! registrations; the registration flow reads this table to detect accounts that
//! already exist.

use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::server::{
    error::AppError,
    model::student::{CreateStudentParams, Student},
};

/// Repository providing database operations for student accounts.
pub struct StudentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    /// Creates a new StudentRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Checks whether a student account exists for an email.
    ///
    /// # Arguments
    /// - `email` - Normalized email address
    ///
    /// # Returns
    /// - `Ok(true)` - An account exists
    /// - `Ok(false)` - No account for the email
    /// - `Err(AppError::DbErr)` - Database error during count query
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let count = entity::prelude::Student::find()
            .filter(entity::student::Column::Email.eq(email))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks whether a student account already holds a barcode.
    pub async fn exists_by_barcode(&self, barcode: &str) -> Result<bool, AppError> {
        let count = entity::prelude::Student::find()
            .filter(entity::student::Column::Barcode.eq(barcode))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Finds the student provisioned from a registration.
    ///
    /// # Returns
    /// - `Ok(Some(Student))` - The registration was already provisioned
    /// - `Ok(None)` - Not provisioned yet
    /// - `Err(AppError)` - Database error or corrupt row
    pub async fn find_by_registration_id(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<Student>, AppError> {
        let entity = entity::prelude::Student::find()
            .filter(entity::student::Column::RegistrationId.eq(registration_id.to_string()))
            .one(self.db)
            .await?;

        entity.map(Student::from_entity).transpose()
    }

    /// Creates a student account.
    ///
    /// # Arguments
    /// - `params` - Profile and credentials taken from the completion event
    ///
    /// # Returns
    /// - `Ok(Student)` - The created student
    /// - `Err(AppError::DbErr)` - Database error, including unique violations
    pub async fn create(&self, params: CreateStudentParams) -> Result<Student, AppError> {
        let id = Uuid::new_v4();

        entity::prelude::Student::insert(entity::student::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            email: ActiveValue::Set(params.email.clone()),
            barcode: ActiveValue::Set(params.barcode.clone()),
            first_name: ActiveValue::Set(params.first_name.clone()),
            last_name: ActiveValue::Set(params.last_name.clone()),
            group_id: ActiveValue::Set(params.group_id),
            password_hash: ActiveValue::Set(params.password_hash),
            registration_id: ActiveValue::Set(params.registration_id.to_string()),
            created_at: ActiveValue::Set(params.created_at),
        })
        .exec_without_returning(self.db)
        .await?;

        Ok(Student {
            id,
            registration_id: params.registration_id,
            email: params.email,
            barcode: params.barcode,
            first_name: params.first_name,
            last_name: params.last_name,
            group_id: params.group_id,
            created_at: params.created_at,
        })
    }
}
