use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(string(Registration::Id).primary_key())
                    .col(string(Registration::Email))
                    // NULL once the registration is terminal, so only in-flight
                    // registrations compete for the unique index.
                    .col(string_null(Registration::ActiveEmail).unique_key())
                    .col(string_len(Registration::Status, 16))
                    .col(string_len(Registration::VerificationCode, 32))
                    .col(integer(Registration::CodeAttempts).default(0))
                    .col(timestamp_with_time_zone(Registration::CodeExpiresAt))
                    .col(timestamp_with_time_zone(Registration::ResendAvailableAt))
                    .col(timestamp_with_time_zone_null(Registration::VerifiedAt))
                    .col(timestamp_with_time_zone_null(Registration::CompletedAt))
                    .col(string_null(Registration::Barcode).unique_key())
                    .col(integer(Registration::Version).default(1))
                    .col(
                        timestamp_with_time_zone(Registration::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Registration::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_email_created_at")
                    .table(Registration::Table)
                    .col(Registration::Email)
                    .col(Registration::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_status")
                    .table(Registration::Table)
                    .col(Registration::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Registration {
    Table,
    Id,
    Email,
    ActiveEmail,
    Status,
    VerificationCode,
    CodeAttempts,
    CodeExpiresAt,
    ResendAvailableAt,
    VerifiedAt,
    CompletedAt,
    Barcode,
    Version,
    CreatedAt,
    UpdatedAt,
}
