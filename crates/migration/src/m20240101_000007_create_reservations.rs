//! Create `reservations` table. Rooms with reservations cannot be deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(uuid(Reservations::Id).primary_key())
                    .col(uuid_null(Reservations::GuestId))
                    .col(string_len(Reservations::GuestName, 128))
                    .col(string_len(Reservations::GuestEmail, 255))
                    .col(uuid(Reservations::RoomId))
                    .col(string_len(Reservations::RoomNumber, 16))
                    .col(string_len(Reservations::RoomType, 32))
                    .col(date(Reservations::CheckIn))
                    .col(date(Reservations::CheckOut))
                    .col(string_len(Reservations::Status, 32).default("confirmed"))
                    .col(double(Reservations::TotalAmount))
                    .col(string_len(Reservations::Currency, 8).default("USD"))
                    .col(string_len(Reservations::PaymentStatus, 32).default("pending"))
                    .col(integer(Reservations::NumberOfGuests).default(1))
                    .col(json(Reservations::SpecialRequests))
                    .col(timestamp_with_time_zone(Reservations::CreatedAt))
                    .col(timestamp_with_time_zone(Reservations::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_room")
                            .from(Reservations::Table, Reservations::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_guest")
                            .from(Reservations::Table, Reservations::GuestId)
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
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reservations {
    Table,
    Id,
    GuestId,
    GuestName,
    GuestEmail,
    RoomId,
    RoomNumber,
    RoomType,
    CheckIn,
    CheckOut,
    Status,
    TotalAmount,
    Currency,
    PaymentStatus,
    NumberOfGuests,
    SpecialRequests,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rooms { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
