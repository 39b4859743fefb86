//! Create `work_orders` table; assignee and reporter are optional user FKs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(uuid(WorkOrders::Id).primary_key())
                    .col(string_len(WorkOrders::RoomNumber, 16))
                    .col(string_len(WorkOrders::Issue, 256))
                    .col(text_null(WorkOrders::Description))
                    .col(string_len(WorkOrders::Priority, 16).default("medium"))
                    .col(string_len(WorkOrders::Status, 32).default("pending"))
                    .col(uuid_null(WorkOrders::Assignee))
                    .col(string_len_null(WorkOrders::AssigneeName, 128))
                    .col(uuid_null(WorkOrders::ReportedBy))
                    .col(string_len(WorkOrders::Category, 64))
                    .col(double_null(WorkOrders::EstimatedCost))
                    .col(double_null(WorkOrders::ActualCost))
                    .col(timestamp_with_time_zone_null(WorkOrders::StartedAt))
                    .col(timestamp_with_time_zone_null(WorkOrders::CompletedAt))
                    .col(timestamp_with_time_zone(WorkOrders::CreatedAt))
                    .col(timestamp_with_time_zone(WorkOrders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_assignee")
                            .from(WorkOrders::Table, WorkOrders::Assignee)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_reported_by")
                            .from(WorkOrders::Table, WorkOrders::ReportedBy)
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
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
    RoomNumber,
    Issue,
    Description,
    Priority,
    Status,
    Assignee,
    AssigneeName,
    ReportedBy,
    Category,
    EstimatedCost,
    ActualCost,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
