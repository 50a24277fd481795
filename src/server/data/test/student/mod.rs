use crate::server::{
    data::student::StudentRepository, error::AppError, model::student::CreateStudentParams,
};
use chrono::Utc;
use test_utils::{builder::TestBuilder, factory};
use uuid::Uuid;

mod create;
mod exists;
