//! Timestamps stamped by the `pending -> in-progress -> completed` workflow
//! shared by housekeeping tasks and work orders.

use chrono::{DateTime, Utc};

use models::housekeeping_task::{STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stamps {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// `pending -> in-progress` stamps `started_at`; entering `completed` from
/// any other status stamps `completed_at`. Everything else stamps nothing.
pub fn stamps(current: &str, next: Option<&str>, now: DateTime<Utc>) -> Stamps {
    Stamps {
        started_at: (next == Some(STATUS_IN_PROGRESS) && current == STATUS_PENDING).then_some(now),
        completed_at: (next == Some(STATUS_COMPLETED) && current != STATUS_COMPLETED).then_some(now),
    }
}
