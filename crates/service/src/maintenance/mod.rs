//! Maintenance work orders.

pub mod repository;
pub mod service;

pub use repository::{MaintenanceRepository, SeaOrmMaintenanceRepository, WorkOrderChanges, WorkOrderFilter, WorkOrderPatch};
pub use service::MaintenanceService;
