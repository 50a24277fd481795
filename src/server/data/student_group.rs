//! Student group data repository.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::server::{error::AppError, model::group::StudentGroup};

/// Repository providing read access to student groups.
///
/// Groups are reference data seeded outside the registration flow.
pub struct StudentGroupRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StudentGroupRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Checks whether a group exists.
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = entity::prelude::StudentGroup::find()
            .filter(entity::student_group::Column::Id.eq(id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets all groups ordered by name.
    pub async fn get_all(&self) -> Result<Vec<StudentGroup>, AppError> {
        let entities = entity::prelude::StudentGroup::find()
            .order_by_asc(entity::student_group::Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(StudentGroup::from_entity).collect())
    }
}
