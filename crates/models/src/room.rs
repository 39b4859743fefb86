use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: String,
    pub floor: i32,
    pub occupants: i32,
    pub guest_name: Option<String>,
    pub cleaning_status: String,
    #[sea_orm(column_type = "Double")]
    pub base_rate: f64,
    #[sea_orm(column_type = "Double")]
    pub current_rate: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize)]
pub struct NewRoom {
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub floor: i32,
    pub base_rate: f64,
    #[serde(default)]
    pub current_rate: Option<f64>,
}

pub async fn create(db: &DatabaseConnection, input: NewRoom) -> Result<Model, ModelError> {
    if input.number.trim().is_empty() {
        return Err(ModelError::Validation("room number required".into()));
    }
    if input.base_rate < 0.0 {
        return Err(ModelError::Validation("base rate must be >= 0".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set(input.number.trim().to_string()),
        room_type: Set(input.room_type),
        status: Set("available".into()),
        floor: Set(input.floor),
        occupants: Set(0),
        guest_name: Set(None),
        cleaning_status: Set("clean".into()),
        base_rate: Set(input.base_rate),
        current_rate: Set(input.current_rate.unwrap_or(input.base_rate)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::db)
}
