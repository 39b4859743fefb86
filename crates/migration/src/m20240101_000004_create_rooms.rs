//! Create `rooms` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(uuid(Rooms::Id).primary_key())
                    .col(string_len(Rooms::Number, 16).unique_key())
                    .col(string_len(Rooms::Type, 32))
                    .col(string_len(Rooms::Status, 32).default("available"))
                    .col(integer(Rooms::Floor))
                    .col(integer(Rooms::Occupants).default(0))
                    .col(string_len_null(Rooms::GuestName, 128))
                    .col(string_len(Rooms::CleaningStatus, 32).default("clean"))
                    .col(double(Rooms::BaseRate))
                    .col(double(Rooms::CurrentRate))
                    .col(timestamp_with_time_zone(Rooms::CreatedAt))
                    .col(timestamp_with_time_zone(Rooms::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rooms::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    Number,
    Type,
    Status,
    Floor,
    Occupants,
    GuestName,
    CleaningStatus,
    BaseRate,
    CurrentRate,
    CreatedAt,
    UpdatedAt,
}
