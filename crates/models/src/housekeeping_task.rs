use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "housekeeping_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub room_number: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub task_type: String,
    pub priority: String,
    pub status: String,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub estimated_time: Option<i32>,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Assignee }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Assignee => Entity::belongs_to(user::Entity)
                .from(Column::Assignee)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const DEFAULT_PRIORITY: &str = "medium";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub room_number: String,
    #[serde(default, rename = "type")]
    pub task_type: String,
    pub priority: Option<String>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub estimated_time: Option<i32>,
}

pub async fn create(db: &DatabaseConnection, input: NewTask) -> Result<Model, ModelError> {
    if input.room_number.trim().is_empty() || input.task_type.trim().is_empty() {
        return Err(ModelError::Validation("room number and task type are required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        room_number: Set(input.room_number),
        task_type: Set(input.task_type),
        priority: Set(input.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        status: Set(STATUS_PENDING.to_string()),
        assignee: Set(input.assignee),
        assignee_name: Set(input.assignee_name),
        estimated_time: Set(input.estimated_time),
        started_at: Set(None),
        completed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::db)
}
