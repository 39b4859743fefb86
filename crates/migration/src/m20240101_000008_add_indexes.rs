use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sessions: list/cleanup per user
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_user")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_expires_at")
                    .table(Sessions::Table)
                    .col(Sessions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // Rooms: filter by status
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_status")
                    .table(Rooms::Table)
                    .col(Rooms::Status)
                    .to_owned(),
            )
            .await?;

        // Housekeeping: filter by status/priority
        manager
            .create_index(
                Index::create()
                    .name("idx_housekeeping_status_priority")
                    .table(HousekeepingTasks::Table)
                    .col(HousekeepingTasks::Status)
                    .col(HousekeepingTasks::Priority)
                    .to_owned(),
            )
            .await?;

        // Work orders: filter by status/priority
        manager
            .create_index(
                Index::create()
                    .name("idx_work_orders_status_priority")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::Status)
                    .col(WorkOrders::Priority)
                    .to_owned(),
            )
            .await?;

        // Reservations: filter by status, per-guest lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_guest")
                    .table(Reservations::Table)
                    .col(Reservations::GuestId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_reservations_guest").table(Reservations::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_reservations_status").table(Reservations::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_work_orders_status_priority").table(WorkOrders::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_housekeeping_status_priority").table(HousekeepingTasks::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_rooms_status").table(Rooms::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_sessions_expires_at").table(Sessions::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_sessions_user").table(Sessions::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sessions { Table, UserId, ExpiresAt }

#[derive(DeriveIden)]
enum Rooms { Table, Status }

#[derive(DeriveIden)]
enum HousekeepingTasks { Table, Status, Priority }

#[derive(DeriveIden)]
enum WorkOrders { Table, Status, Priority }

#[derive(DeriveIden)]
enum Reservations { Table, Status, GuestId }
