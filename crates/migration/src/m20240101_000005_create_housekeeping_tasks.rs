//! Create `housekeeping_tasks` table with an optional FK to the assignee.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HousekeepingTasks::Table)
                    .if_not_exists()
                    .col(uuid(HousekeepingTasks::Id).primary_key())
                    .col(string_len(HousekeepingTasks::RoomNumber, 16))
                    .col(string_len(HousekeepingTasks::Type, 64))
                    .col(string_len(HousekeepingTasks::Priority, 16).default("medium"))
                    .col(string_len(HousekeepingTasks::Status, 32).default("pending"))
                    .col(uuid_null(HousekeepingTasks::Assignee))
                    .col(string_len_null(HousekeepingTasks::AssigneeName, 128))
                    .col(integer_null(HousekeepingTasks::EstimatedTime))
                    .col(timestamp_with_time_zone_null(HousekeepingTasks::StartedAt))
                    .col(timestamp_with_time_zone_null(HousekeepingTasks::CompletedAt))
                    .col(timestamp_with_time_zone(HousekeepingTasks::CreatedAt))
                    .col(timestamp_with_time_zone(HousekeepingTasks::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_housekeeping_tasks_assignee")
                            .from(HousekeepingTasks::Table, HousekeepingTasks::Assignee)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HousekeepingTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HousekeepingTasks {
    Table,
    Id,
    RoomNumber,
    Type,
    Priority,
    Status,
    Assignee,
    AssigneeName,
    EstimatedTime,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
