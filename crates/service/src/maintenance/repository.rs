use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::work_order::{self, NewWorkOrder};
use crate::errors::{db_err, ServiceError};
use crate::patch::nullable;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl WorkOrderFilter {
    pub fn matches(&self, w: &work_order::Model) -> bool {
        self.status.as_ref().map_or(true, |s| &w.status == s)
            && self.priority.as_ref().map_or(true, |p| &w.priority == p)
    }
}

/// Client-editable work order fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderPatch {
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_cost: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub actual_cost: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkOrderChanges {
    pub patch: WorkOrderPatch,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, filter: &WorkOrderFilter) -> Result<Vec<work_order::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<work_order::Model>, ServiceError>;
    async fn create(&self, input: NewWorkOrder) -> Result<work_order::Model, ServiceError>;
    async fn update(&self, id: Uuid, changes: &WorkOrderChanges, at: DateTime<Utc>) -> Result<Option<work_order::Model>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

pub struct SeaOrmMaintenanceRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl MaintenanceRepository for SeaOrmMaintenanceRepository {
    async fn list(&self, filter: &WorkOrderFilter) -> Result<Vec<work_order::Model>, ServiceError> {
        let mut q = work_order::Entity::find();
        if let Some(s) = &filter.status { q = q.filter(work_order::Column::Status.eq(s.as_str())); }
        if let Some(p) = &filter.priority { q = q.filter(work_order::Column::Priority.eq(p.as_str())); }
        q.order_by_desc(work_order::Column::CreatedAt).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<work_order::Model>, ServiceError> {
        work_order::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn create(&self, input: NewWorkOrder) -> Result<work_order::Model, ServiceError> {
        Ok(work_order::create(&self.db, input).await?)
    }

    async fn update(&self, id: Uuid, changes: &WorkOrderChanges, at: DateTime<Utc>) -> Result<Option<work_order::Model>, ServiceError> {
        let Some(found) = self.get(id).await? else { return Ok(None) };
        let mut am: work_order::ActiveModel = found.into();
        let p = &changes.patch;
        if let Some(s) = &p.status { am.status = Set(s.clone()); }
        if let Some(v) = &p.priority { am.priority = Set(v.clone()); }
        if let Some(v) = p.assignee { am.assignee = Set(v); }
        if let Some(v) = &p.assignee_name { am.assignee_name = Set(v.clone()); }
        if let Some(v) = p.estimated_cost { am.estimated_cost = Set(v); }
        if let Some(v) = p.actual_cost { am.actual_cost = Set(v); }
        if let Some(v) = &p.description { am.description = Set(v.clone()); }
        if let Some(t) = changes.started_at { am.started_at = Set(Some(t.into())); }
        if let Some(t) = changes.completed_at { am.completed_at = Set(Some(t.into())); }
        am.updated_at = Set(at.into());
        am.update(&self.db).await.map(Some).map_err(db_err)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(work_order::delete(&self.db, id).await?)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockMaintenanceRepository {
        orders: Mutex<HashMap<Uuid, work_order::Model>>,
    }

    fn poisoned<T>(_: T) -> ServiceError {
        ServiceError::Db("mock store lock poisoned".into())
    }

    #[async_trait]
    impl MaintenanceRepository for MockMaintenanceRepository {
        async fn list(&self, filter: &WorkOrderFilter) -> Result<Vec<work_order::Model>, ServiceError> {
            let orders = self.orders.lock().map_err(poisoned)?;
            let mut out: Vec<_> = orders.values().filter(|w| filter.matches(w)).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<work_order::Model>, ServiceError> {
            Ok(self.orders.lock().map_err(poisoned)?.get(&id).cloned())
        }

        async fn create(&self, input: NewWorkOrder) -> Result<work_order::Model, ServiceError> {
            let now = Utc::now().into();
            let w = work_order::Model {
                id: Uuid::new_v4(),
                room_number: input.room_number,
                issue: input.issue,
                description: input.description,
                priority: input.priority.unwrap_or_else(|| work_order::DEFAULT_PRIORITY.to_string()),
                status: work_order::STATUS_PENDING.to_string(),
                assignee: input.assignee,
                assignee_name: input.assignee_name,
                reported_by: input.reported_by,
                category: input.category,
                estimated_cost: input.estimated_cost,
                actual_cost: None,
                started_at: None,
                completed_at: None,
                created_at: now,
                updated_at: now,
            };
            self.orders.lock().map_err(poisoned)?.insert(w.id, w.clone());
            Ok(w)
        }

        async fn update(&self, id: Uuid, changes: &WorkOrderChanges, at: DateTime<Utc>) -> Result<Option<work_order::Model>, ServiceError> {
            let mut orders = self.orders.lock().map_err(poisoned)?;
            Ok(orders.get_mut(&id).map(|w| {
                let p = &changes.patch;
                if let Some(s) = &p.status { w.status = s.clone(); }
                if let Some(v) = &p.priority { w.priority = v.clone(); }
                if let Some(v) = p.assignee { w.assignee = v; }
                if let Some(v) = &p.assignee_name { w.assignee_name = v.clone(); }
                if let Some(v) = p.estimated_cost { w.estimated_cost = v; }
                if let Some(v) = p.actual_cost { w.actual_cost = v; }
                if let Some(v) = &p.description { w.description = v.clone(); }
                if let Some(ts) = changes.started_at { w.started_at = Some(ts.into()); }
                if let Some(ts) = changes.completed_at { w.completed_at = Some(ts.into()); }
                w.updated_at = at.into();
                w.clone()
            }))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.orders.lock().map_err(poisoned)?.remove(&id).is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn leak(room: &str) -> NewWorkOrder {
        NewWorkOrder { room_number: room.into(), issue: "Leaking tap".into(), category: "plumbing".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn create_update_filter_and_delete() -> Result<(), anyhow::Error> {
        let repo = SeaOrmMaintenanceRepository { db: get_db().await? };
        let a = repo.create(leak("101")).await?;
        let b = repo.create(NewWorkOrder { priority: Some("urgent".into()), ..leak("102") }).await?;

        let urgent = repo.list(&WorkOrderFilter { priority: Some("urgent".into()), ..Default::default() }).await?;
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].id, b.id);

        let now = Utc::now();
        let changes = WorkOrderChanges {
            patch: WorkOrderPatch { status: Some("completed".into()), actual_cost: Some(Some(95.5)), ..Default::default() },
            started_at: None,
            completed_at: Some(now),
        };
        let done = repo.update(a.id, &changes, now).await?.unwrap();
        assert_eq!(done.status, "completed");
        assert_eq!(done.actual_cost, Some(95.5));
        assert!(done.completed_at.is_some());
        assert!(repo.update(Uuid::new_v4(), &changes, now).await?.is_none());

        assert!(repo.delete(a.id).await?);
        assert!(!repo.delete(a.id).await?);
        assert_eq!(repo.list(&WorkOrderFilter::default()).await?.len(), 1);
        Ok(())
    }
}
