use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_student_group_table::StudentGroup;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(string(Student::Id).primary_key())
                    .col(string_uniq(Student::Email))
                    .col(string_uniq(Student::Barcode))
                    .col(string(Student::FirstName))
                    .col(string(Student::LastName))
                    .col(integer(Student::GroupId))
                    .col(string(Student::PasswordHash))
                    .col(string_uniq(Student::RegistrationId))
                    .col(
                        timestamp_with_time_zone(Student::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_group_id")
                            .from(Student::Table, Student::GroupId)
                            .to(StudentGroup::Table, StudentGroup::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Student {
    Table,
    Id,
    Email,
    Barcode,
    FirstName,
    LastName,
    GroupId,
    PasswordHash,
    RegistrationId,
    CreatedAt,
}
