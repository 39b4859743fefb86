use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::room::{self, NewRoom};
use crate::errors::{db_err, ServiceError};
use crate::patch::nullable;

/// Query-string filters for the room list. All optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub status: Option<String>,
    pub floor: Option<i32>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

impl RoomFilter {
    pub fn matches(&self, r: &room::Model) -> bool {
        self.status.as_ref().map_or(true, |s| &r.status == s)
            && self.floor.map_or(true, |f| r.floor == f)
            && self.room_type.as_ref().map_or(true, |t| &r.room_type == t)
    }
}

/// Fields a status update may touch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomStatusPatch {
    pub status: Option<String>,
    pub occupants: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub guest_name: Option<Option<String>>,
    pub cleaning_status: Option<String>,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Ordered by room number.
    async fn list(&self, filter: &RoomFilter) -> Result<Vec<room::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<room::Model>, ServiceError>;
    async fn create(&self, input: NewRoom) -> Result<room::Model, ServiceError>;
    /// `None` when the room does not exist.
    async fn update_status(&self, id: Uuid, patch: &RoomStatusPatch, at: DateTime<Utc>) -> Result<Option<room::Model>, ServiceError>;
}

fn apply_patch(am: &mut room::ActiveModel, patch: &RoomStatusPatch) {
    if let Some(s) = &patch.status { am.status = Set(s.clone()); }
    if let Some(n) = patch.occupants { am.occupants = Set(n); }
    if let Some(g) = &patch.guest_name { am.guest_name = Set(g.clone()); }
    if let Some(c) = &patch.cleaning_status { am.cleaning_status = Set(c.clone()); }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmRoomRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn list(&self, filter: &RoomFilter) -> Result<Vec<room::Model>, ServiceError> {
        let mut q = room::Entity::find();
        if let Some(s) = &filter.status { q = q.filter(room::Column::Status.eq(s.as_str())); }
        if let Some(f) = filter.floor { q = q.filter(room::Column::Floor.eq(f)); }
        if let Some(t) = &filter.room_type { q = q.filter(room::Column::RoomType.eq(t.as_str())); }
        q.order_by_asc(room::Column::Number).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<room::Model>, ServiceError> {
        room::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn create(&self, input: NewRoom) -> Result<room::Model, ServiceError> {
        Ok(room::create(&self.db, input).await?)
    }

    async fn update_status(&self, id: Uuid, patch: &RoomStatusPatch, at: DateTime<Utc>) -> Result<Option<room::Model>, ServiceError> {
        let Some(found) = self.get(id).await? else { return Ok(None) };
        let mut am: room::ActiveModel = found.into();
        apply_patch(&mut am, patch);
        am.updated_at = Set(at.into());
        am.update(&self.db).await.map(Some).map_err(db_err)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockRoomRepository {
        rooms: Mutex<HashMap<Uuid, room::Model>>,
    }

    fn poisoned<T>(_: T) -> ServiceError {
        ServiceError::Db("mock store lock poisoned".into())
    }

    #[async_trait]
    impl RoomRepository for MockRoomRepository {
        async fn list(&self, filter: &RoomFilter) -> Result<Vec<room::Model>, ServiceError> {
            let rooms = self.rooms.lock().map_err(poisoned)?;
            let mut out: Vec<_> = rooms.values().filter(|r| filter.matches(r)).cloned().collect();
            out.sort_by(|a, b| a.number.cmp(&b.number));
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<room::Model>, ServiceError> {
            Ok(self.rooms.lock().map_err(poisoned)?.get(&id).cloned())
        }

        async fn create(&self, input: NewRoom) -> Result<room::Model, ServiceError> {
            let mut rooms = self.rooms.lock().map_err(poisoned)?;
            let number = input.number.trim().to_string();
            if number.is_empty() {
                return Err(ServiceError::Validation("room number required".into()));
            }
            if rooms.values().any(|r| r.number == number) {
                return Err(models::errors::ModelError::Conflict(format!("room {number} exists")).into());
            }
            let now = Utc::now().into();
            let r = room::Model {
                id: Uuid::new_v4(),
                number,
                room_type: input.room_type,
                status: crate::rooms::STATUS_AVAILABLE.into(),
                floor: input.floor,
                occupants: 0,
                guest_name: None,
                cleaning_status: "clean".into(),
                base_rate: input.base_rate,
                current_rate: input.current_rate.unwrap_or(input.base_rate),
                created_at: now,
                updated_at: now,
            };
            rooms.insert(r.id, r.clone());
            Ok(r)
        }

        async fn update_status(&self, id: Uuid, patch: &RoomStatusPatch, at: DateTime<Utc>) -> Result<Option<room::Model>, ServiceError> {
            let mut rooms = self.rooms.lock().map_err(poisoned)?;
            Ok(rooms.get_mut(&id).map(|r| {
                if let Some(s) = &patch.status { r.status = s.clone(); }
                if let Some(n) = patch.occupants { r.occupants = n; }
                if let Some(g) = &patch.guest_name { r.guest_name = g.clone(); }
                if let Some(c) = &patch.cleaning_status { r.cleaning_status = c.clone(); }
                r.updated_at = at.into();
                r.clone()
            }))
        }
    }
}
