//! Student group domain model.

use crate::model::group::StudentGroupDto;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentGroup {
    pub id: i32,
    pub name: String,
}

impl StudentGroup {
    pub fn from_entity(entity: entity::student_group::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }

    pub fn into_dto(self) -> StudentGroupDto {
        StudentGroupDto {
            id: self.id,
            name: self.name,
        }
    }
}
