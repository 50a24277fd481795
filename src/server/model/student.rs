//! Student accounts and the parameters for provisioning them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::server::{error::AppError, util::parse::parse_uuid_from_string};

/// Everything needed to create a student row from a completed registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStudentParams {
    pub registration_id: Uuid,
    pub email: String,
    pub barcode: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: i32,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Provisioned student account.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub email: String,
    pub barcode: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn from_entity(entity: entity::student::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: parse_uuid_from_string(entity.id)?,
            registration_id: parse_uuid_from_string(entity.registration_id)?,
            email: entity.email,
            barcode: entity.barcode,
            first_name: entity.first_name,
            last_name: entity.last_name,
            group_id: entity.group_id,
            created_at: entity.created_at,
        })
    }
}
