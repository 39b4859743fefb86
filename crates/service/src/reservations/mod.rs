//! Room reservations. Cancelling keeps the row with status `cancelled`.

pub mod repository;
pub mod service;

pub use repository::{ReservationFilter, ReservationPatch, ReservationRepository, SeaOrmReservationRepository};
pub use service::{ReservationRequest, ReservationService};
