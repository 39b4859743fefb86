//! Housekeeping task board.

pub mod repository;
pub mod service;

pub use repository::{HousekeepingRepository, SeaOrmHousekeepingRepository, TaskChanges, TaskFilter, TaskPatch};
pub use service::HousekeepingService;
