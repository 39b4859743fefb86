use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

pub use crate::housekeeping_task::{DEFAULT_PRIORITY, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub room_number: String,
    pub issue: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub reported_by: Option<Uuid>,
    pub category: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub estimated_cost: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub actual_cost: Option<f64>,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Assignee, Reporter }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Assignee => Entity::belongs_to(user::Entity)
                .from(Column::Assignee)
                .to(user::Column::Id)
                .into(),
            Relation::Reporter => Entity::belongs_to(user::Entity)
                .from(Column::ReportedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of a new work order. `reported_by` is never read from the client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewWorkOrder {
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub issue: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub category: String,
    pub estimated_cost: Option<f64>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    #[serde(skip)]
    pub reported_by: Option<Uuid>,
}

impl NewWorkOrder {
    pub fn is_complete(&self) -> bool {
        !(self.room_number.trim().is_empty() || self.issue.trim().is_empty() || self.category.trim().is_empty())
    }
}

pub async fn create(db: &DatabaseConnection, input: NewWorkOrder) -> Result<Model, ModelError> {
    if !input.is_complete() {
        return Err(ModelError::Validation("room number, issue and category are required".into()));
    }
    if input.estimated_cost.is_some_and(|c| c < 0.0) {
        return Err(ModelError::Validation("estimated cost must be >= 0".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        room_number: Set(input.room_number),
        issue: Set(input.issue),
        description: Set(input.description),
        priority: Set(input.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        status: Set(STATUS_PENDING.to_string()),
        assignee: Set(input.assignee),
        assignee_name: Set(input.assignee_name),
        reported_by: Set(input.reported_by),
        category: Set(input.category),
        estimated_cost: Set(input.estimated_cost),
        actual_cost: Set(None),
        started_at: Set(None),
        completed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::db)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(ModelError::db)?;
    Ok(res.rows_affected > 0)
}
