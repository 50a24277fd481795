//! SeaORM entity definitions for the student registration schema.

pub mod prelude;

pub mod outbox_event;
pub mod registration;
pub mod student;
pub mod student_group;
