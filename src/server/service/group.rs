use sea_orm::DatabaseConnection;

use crate::server::{
    data::student_group::StudentGroupRepository, error::AppError, model::group::StudentGroup,
};

pub struct StudentGroupService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StudentGroupService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every group a registrant can join
    pub async fn get_all(&self) -> Result<Vec<StudentGroup>, AppError> {
        StudentGroupRepository::new(self.db).get_all().await
    }
}
