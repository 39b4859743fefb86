//! Service layer: business logic on top of `models`, independent of the web
//! framework.
//! - `auth`: session authenticator and role policy.
//! - `rooms`, `housekeeping`, `maintenance`, `reservations`: protected
//!   resources gated by that policy.
//! - `patch`: allow-list driven partial updates shared by those resources.
//! - `progress`: timestamps of the task and work-order status workflow.

pub mod auth;
pub mod clock;
pub mod errors;
pub mod housekeeping;
pub mod maintenance;
pub mod patch;
pub mod progress;
pub mod reservations;
pub mod rooms;
#[cfg(test)]
pub mod test_support;
