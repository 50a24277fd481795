use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OutboxEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(OutboxEvent::Id))
                    .col(string(OutboxEvent::AggregateId))
                    .col(string_len(OutboxEvent::EventType, 64))
                    .col(text(OutboxEvent::Payload))
                    .col(integer(OutboxEvent::Attempts).default(0))
                    .col(text_null(OutboxEvent::LastError))
                    .col(timestamp_with_time_zone(OutboxEvent::AvailableAt))
                    .col(timestamp_with_time_zone_null(OutboxEvent::PublishedAt))
                    .col(
                        timestamp_with_time_zone(OutboxEvent::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_outbox_event_unpublished")
                    .table(OutboxEvent::Table)
                    .col(OutboxEvent::PublishedAt)
                    .col(OutboxEvent::AvailableAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OutboxEvent {
    Table,
    Id,
    AggregateId,
    EventType,
    Payload,
    Attempts,
    LastError,
    AvailableAt,
    PublishedAt,
    CreatedAt,
}
