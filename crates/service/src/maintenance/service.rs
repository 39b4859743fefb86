use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::work_order::{self, NewWorkOrder};
use crate::clock::{Clock, SystemClock};
use crate::errors::ServiceError;
use crate::patch::{self, WORK_ORDER_FIELDS};
use crate::progress;
use super::repository::{MaintenanceRepository, WorkOrderChanges, WorkOrderFilter, WorkOrderPatch};

const ENTITY: &str = "Work order";

pub struct MaintenanceService<R: MaintenanceRepository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: MaintenanceRepository + ?Sized> MaintenanceService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self::with_clock(repo, Arc::new(SystemClock)) }

    pub fn with_clock(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self { Self { repo, clock } }

    pub async fn list(&self, filter: &WorkOrderFilter) -> Result<Vec<work_order::Model>, ServiceError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<work_order::Model, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::not_found(ENTITY))
    }

    /// File a work order on behalf of `reported_by`.
    #[instrument(skip(self, input), fields(room = %input.room_number))]
    pub async fn create(&self, mut input: NewWorkOrder, reported_by: Uuid) -> Result<work_order::Model, ServiceError> {
        if !input.is_complete() {
            return Err(ServiceError::MissingFields("Room number, issue, and category are required".into()));
        }
        input.reported_by = Some(reported_by);
        let created = self.repo.create(input).await?;
        info!(work_order_id = %created.id, category = %created.category, %reported_by, "work_order_created");
        Ok(created)
    }

    /// Apply the allow-listed subset of `body`, stamping `started_at` and
    /// `completed_at` the same way housekeeping tasks do.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: Uuid, body: &Value) -> Result<work_order::Model, ServiceError> {
        let existing = self.get(id).await?;
        let patch: WorkOrderPatch = patch::apply(WORK_ORDER_FIELDS, body)?;
        if [patch.estimated_cost, patch.actual_cost].into_iter().flatten().flatten().any(|c| c < 0.0) {
            return Err(ServiceError::Validation("costs must be >= 0".into()));
        }
        let now = self.clock.now();
        let stamps = progress::stamps(&existing.status, patch.status.as_deref(), now);
        let changes = WorkOrderChanges { patch, started_at: stamps.started_at, completed_at: stamps.completed_at };
        let updated = self.repo.update(id, &changes, now).await?.ok_or(ServiceError::not_found(ENTITY))?;
        info!(work_order_id = %id, status = %updated.status, "work_order_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(ENTITY));
        }
        info!(work_order_id = %id, "work_order_deleted");
        Ok(())
    }
}
