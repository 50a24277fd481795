//! Student account provisioning.
//!
//! Reacts to completed registrations by creating the student row. Delivery from
//! the outbox is at-least-once, so provisioning is idempotent on the
//! registration ID.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::student::StudentRepository,
    error::AppError,
    model::{
        event::RegistrationEvent,
        student::{CreateStudentParams, Student},
    },
};

pub struct StudentProvisioner<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StudentProvisioner<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the student for a `StudentRegistrationCompleted` event.
    ///
    /// # Arguments
    /// - `event` - Event to handle; other event types are ignored
    /// - `now` - Account creation timestamp
    ///
    /// # Returns
    /// - `Ok(Some(Student))` - The student, created now or by an earlier delivery
    /// - `Ok(None)` - The event does not provision anything
    /// - `Err(AppError)` - Database error
    pub async fn handle(
        &self,
        event: &RegistrationEvent,
        now: DateTime<Utc>,
    ) -> Result<Option<Student>, AppError> {
        let RegistrationEvent::StudentRegistrationCompleted {
            registration_id,
            email,
            barcode,
            first_name,
            last_name,
            group_id,
            password_hash,
        } = event
        else {
            return Ok(None);
        };

        let repo = StudentRepository::new(self.db);

        if let Some(existing) = repo.find_by_registration_id(*registration_id).await? {
            tracing::debug!(%registration_id, "Student already provisioned");
            return Ok(Some(existing));
        }

        let student = repo
            .create(CreateStudentParams {
                registration_id: *registration_id,
                email: email.clone(),
                barcode: barcode.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                group_id: *group_id,
                password_hash: password_hash.clone(),
                created_at: now,
            })
            .await?;

        tracing::info!(%registration_id, student_id = %student.id, "Provisioned student");

        Ok(Some(student))
    }
}
