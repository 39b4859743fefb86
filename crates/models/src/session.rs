use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique, column_type = "Text")]
    pub token: String,
    #[sea_orm(unique, column_type = "Text")]
    pub refresh_token: String,
    pub expires_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    token: &str,
    refresh_token: &str,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token: Set(token.to_string()),
        refresh_token: Set(refresh_token.to_string()),
        expires_at: Set(expires_at.into()),
        created_at: Set(created_at.into()),
    };
    am.insert(db).await.map_err(ModelError::db)
}

pub async fn find_by_token(db: &DatabaseConnection, token: &str) -> Result<Option<Model>, ModelError> {
    Entity::find().filter(Column::Token.eq(token)).one(db).await.map_err(ModelError::db)
}

pub async fn find_by_refresh_token(db: &DatabaseConnection, refresh_token: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::RefreshToken.eq(refresh_token))
        .one(db)
        .await
        .map_err(ModelError::db)
}

/// Overwrite the token pair and expiry of an existing session in place.
pub async fn rotate(
    db: &DatabaseConnection,
    id: Uuid,
    token: &str,
    refresh_token: &str,
    expires_at: DateTime<Utc>,
) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await.map_err(ModelError::db)? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.token = Set(token.to_string());
    am.refresh_token = Set(refresh_token.to_string());
    am.expires_at = Set(expires_at.into());
    am.update(db).await.map(Some).map_err(ModelError::db)
}

/// Returns whether a row was removed.
pub async fn delete_by_token(db: &DatabaseConnection, token: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Token.eq(token))
        .exec(db)
        .await
        .map_err(ModelError::db)?;
    Ok(res.rows_affected > 0)
}
