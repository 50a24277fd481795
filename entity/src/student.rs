use sea_orm::entity::prelude::*;

/// Provisioned student account created once a registration completes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "student")]
pub struct Model {
    /// UUID string.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub barcode: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: i32,
    pub password_hash: String,
    /// Registration that produced this account; provisioning is idempotent on it.
    #[sea_orm(unique)]
    pub registration_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_group::Entity",
        from = "Column::GroupId",
        to = "super::student_group::Column::Id"
    )]
    StudentGroup,
}

impl Related<super::student_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
