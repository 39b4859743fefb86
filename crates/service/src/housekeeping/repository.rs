use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::housekeeping_task::{self as task, NewTask};
use crate::errors::{db_err, ServiceError};
use crate::patch::nullable;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, t: &task::Model) -> bool {
        self.status.as_ref().map_or(true, |s| &t.status == s)
            && self.priority.as_ref().map_or(true, |p| &t.priority == p)
    }
}

/// Client-editable task fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_time: Option<Option<i32>>,
}

/// A patch plus the timestamps the status transition stamps.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub patch: TaskPatch,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait HousekeepingRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<task::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<task::Model>, ServiceError>;
    async fn create(&self, input: NewTask) -> Result<task::Model, ServiceError>;
    async fn update(&self, id: Uuid, changes: &TaskChanges, at: DateTime<Utc>) -> Result<Option<task::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmHousekeepingRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl HousekeepingRepository for SeaOrmHousekeepingRepository {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<task::Model>, ServiceError> {
        let mut q = task::Entity::find();
        if let Some(s) = &filter.status { q = q.filter(task::Column::Status.eq(s.as_str())); }
        if let Some(p) = &filter.priority { q = q.filter(task::Column::Priority.eq(p.as_str())); }
        q.order_by_desc(task::Column::CreatedAt).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<task::Model>, ServiceError> {
        task::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn create(&self, input: NewTask) -> Result<task::Model, ServiceError> {
        Ok(task::create(&self.db, input).await?)
    }

    async fn update(&self, id: Uuid, changes: &TaskChanges, at: DateTime<Utc>) -> Result<Option<task::Model>, ServiceError> {
        let Some(found) = self.get(id).await? else { return Ok(None) };
        let mut am: task::ActiveModel = found.into();
        let p = &changes.patch;
        if let Some(s) = &p.status { am.status = Set(s.clone()); }
        if let Some(v) = &p.priority { am.priority = Set(v.clone()); }
        if let Some(v) = p.assignee { am.assignee = Set(v); }
        if let Some(v) = &p.assignee_name { am.assignee_name = Set(v.clone()); }
        if let Some(v) = p.estimated_time { am.estimated_time = Set(v); }
        if let Some(t) = changes.started_at { am.started_at = Set(Some(t.into())); }
        if let Some(t) = changes.completed_at { am.completed_at = Set(Some(t.into())); }
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
    pub struct MockHousekeepingRepository {
        tasks: Mutex<HashMap<Uuid, task::Model>>,
    }

    fn poisoned<T>(_: T) -> ServiceError {
        ServiceError::Db("mock store lock poisoned".into())
    }

    #[async_trait]
    impl HousekeepingRepository for MockHousekeepingRepository {
        async fn list(&self, filter: &TaskFilter) -> Result<Vec<task::Model>, ServiceError> {
            let tasks = self.tasks.lock().map_err(poisoned)?;
            let mut out: Vec<_> = tasks.values().filter(|t| filter.matches(t)).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<task::Model>, ServiceError> {
            Ok(self.tasks.lock().map_err(poisoned)?.get(&id).cloned())
        }

        async fn create(&self, input: NewTask) -> Result<task::Model, ServiceError> {
            let now = Utc::now().into();
            let t = task::Model {
                id: Uuid::new_v4(),
                room_number: input.room_number,
                task_type: input.task_type,
                priority: input.priority.unwrap_or_else(|| task::DEFAULT_PRIORITY.to_string()),
                status: task::STATUS_PENDING.to_string(),
                assignee: input.assignee,
                assignee_name: input.assignee_name,
                estimated_time: input.estimated_time,
                started_at: None,
                completed_at: None,
                created_at: now,
                updated_at: now,
            };
            self.tasks.lock().map_err(poisoned)?.insert(t.id, t.clone());
            Ok(t)
        }

        async fn update(&self, id: Uuid, changes: &TaskChanges, at: DateTime<Utc>) -> Result<Option<task::Model>, ServiceError> {
            let mut tasks = self.tasks.lock().map_err(poisoned)?;
            Ok(tasks.get_mut(&id).map(|t| {
                let p = &changes.patch;
                if let Some(s) = &p.status { t.status = s.clone(); }
                if let Some(v) = &p.priority { t.priority = v.clone(); }
                if let Some(v) = p.assignee { t.assignee = v; }
                if let Some(v) = &p.assignee_name { t.assignee_name = v.clone(); }
                if let Some(v) = p.estimated_time { t.estimated_time = v; }
                if let Some(ts) = changes.started_at { t.started_at = Some(ts.into()); }
                if let Some(ts) = changes.completed_at { t.completed_at = Some(ts.into()); }
                t.updated_at = at.into();
                t.clone()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn create_update_and_filter() -> Result<(), anyhow::Error> {
        let repo = SeaOrmHousekeepingRepository { db: get_db().await? };
        let a = repo.create(NewTask { room_number: "101".into(), task_type: "cleaning".into(), ..Default::default() }).await?;
        let b = repo
            .create(NewTask { room_number: "102".into(), task_type: "turndown".into(), priority: Some("high".into()), ..Default::default() })
            .await?;
        assert_eq!(a.priority, "medium");
        assert_eq!(a.status, "pending");

        let high = repo.list(&TaskFilter { priority: Some("high".into()), ..Default::default() }).await?;
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, b.id);

        let now = Utc::now();
        let changes = TaskChanges {
            patch: TaskPatch { status: Some("in-progress".into()), estimated_time: Some(Some(30)), ..Default::default() },
            started_at: Some(now),
            completed_at: None,
        };
        let updated = repo.update(a.id, &changes, now).await?.unwrap();
        assert_eq!(updated.status, "in-progress");
        assert_eq!(updated.estimated_time, Some(30));
        assert!(updated.started_at.is_some());
        assert!(updated.completed_at.is_none());
        assert!(repo.update(Uuid::new_v4(), &changes, now).await?.is_none());
        Ok(())
    }
}
