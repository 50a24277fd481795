//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations for each
//! domain in the application. Repositories use SeaORM entity models internally and
//! return domain models to keep the data layer separate from business logic.
//!
//! Repositories are generic over `ConnectionTrait` so the same code runs against the
//! pool or inside a transaction; the registration service relies on this to write a
//! state change and its outbox events atomically.

pub mod outbox;
pub mod registration;
pub mod student;
pub mod student_group;

#[cfg(test)]
mod test;

use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
