use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{room, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub guest_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub room_id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub check_in: Date,
    pub check_out: Date,
    pub status: String,
    #[sea_orm(column_type = "Double")]
    pub total_amount: f64,
    pub currency: String,
    pub payment_status: String,
    pub number_of_guests: i32,
    /// JSON array of free-form strings.
    pub special_requests: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Room, Guest }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Room => Entity::belongs_to(room::Entity)
                .from(Column::RoomId)
                .to(room::Column::Id)
                .into(),
            Relation::Guest => Entity::belongs_to(user::Entity)
                .from(Column::GuestId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const PAYMENT_PENDING: &str = "pending";
pub const DEFAULT_CURRENCY: &str = "USD";

/// A reservation with its room already resolved.
#[derive(Clone, Debug)]
pub struct NewReservation {
    pub guest_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub room_id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: f64,
    pub currency: String,
    pub number_of_guests: i32,
    pub special_requests: Vec<String>,
}

impl NewReservation {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.guest_name.trim().is_empty() || !self.guest_email.contains('@') {
            return Err(ModelError::Validation("guest name and a valid guest email are required".into()));
        }
        check_stay(self.check_in, self.check_out)?;
        if self.total_amount < 0.0 {
            return Err(ModelError::Validation("total amount must be >= 0".into()));
        }
        if self.number_of_guests < 1 {
            return Err(ModelError::Validation("number of guests must be >= 1".into()));
        }
        Ok(())
    }
}

/// A stay ends strictly after it starts.
pub fn check_stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), ModelError> {
    if check_out <= check_in {
        return Err(ModelError::Validation("check_out must be after check_in".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewReservation) -> Result<Model, ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        guest_id: Set(input.guest_id),
        guest_name: Set(input.guest_name.trim().to_string()),
        guest_email: Set(input.guest_email.trim().to_lowercase()),
        room_id: Set(input.room_id),
        room_number: Set(input.room_number),
        room_type: Set(input.room_type),
        check_in: Set(input.check_in),
        check_out: Set(input.check_out),
        status: Set(STATUS_CONFIRMED.to_string()),
        total_amount: Set(input.total_amount),
        currency: Set(input.currency),
        payment_status: Set(PAYMENT_PENDING.to_string()),
        number_of_guests: Set(input.number_of_guests),
        special_requests: Set(serde_json::json!(input.special_requests)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::db)
}
