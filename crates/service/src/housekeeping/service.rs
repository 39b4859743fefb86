use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::housekeeping_task::{self as task, NewTask};
use crate::clock::{Clock, SystemClock};
use crate::errors::ServiceError;
use crate::patch::{self, HOUSEKEEPING_TASK_FIELDS};
use crate::progress;
use super::repository::{HousekeepingRepository, TaskChanges, TaskFilter, TaskPatch};

pub struct HousekeepingService<R: HousekeepingRepository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: HousekeepingRepository + ?Sized> HousekeepingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self::with_clock(repo, Arc::new(SystemClock)) }

    pub fn with_clock(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self { Self { repo, clock } }

    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<task::Model>, ServiceError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<task::Model, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::not_found("Task"))
    }

    /// New tasks start `pending`; priority defaults to `medium`.
    #[instrument(skip(self, input), fields(room = %input.room_number))]
    pub async fn create(&self, input: NewTask) -> Result<task::Model, ServiceError> {
        if input.room_number.trim().is_empty() || input.task_type.trim().is_empty() {
            return Err(ServiceError::MissingFields("Room number and task type are required".into()));
        }
        let created = self.repo.create(input).await?;
        info!(task_id = %created.id, task_type = %created.task_type, "housekeeping_task_created");
        Ok(created)
    }

    /// Apply the allow-listed subset of `body`.
    ///
    /// `pending -> in-progress` stamps `started_at`; entering `completed`
    /// from any other status stamps `completed_at`.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: Uuid, body: &Value) -> Result<task::Model, ServiceError> {
        let existing = self.get(id).await?;
        let patch: TaskPatch = patch::apply(HOUSEKEEPING_TASK_FIELDS, body)?;
        let now = self.clock.now();
        let stamps = progress::stamps(&existing.status, patch.status.as_deref(), now);
        let changes = TaskChanges { patch, started_at: stamps.started_at, completed_at: stamps.completed_at };
        let updated = self.repo.update(id, &changes, now).await?.ok_or(ServiceError::not_found("Task"))?;
        info!(task_id = %id, status = %updated.status, "housekeeping_task_updated");
        Ok(updated)
    }
}
