use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::reservation::{self, check_stay, NewReservation, DEFAULT_CURRENCY, STATUS_CANCELLED};
use crate::clock::{Clock, SystemClock};
use crate::errors::ServiceError;
use crate::patch::{self, RESERVATION_FIELDS};
use crate::rooms::RoomRepository;
use super::repository::{ReservationFilter, ReservationPatch, ReservationRepository};

const ENTITY: &str = "Reservation";

/// Body of `POST /reservations`. Room number and type default to the
/// booked room's own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationRequest {
    pub guest_id: Option<Uuid>,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub guest_email: String,
    pub room_id: Option<Uuid>,
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
    pub number_of_guests: Option<i32>,
    #[serde(default)]
    pub special_requests: Vec<String>,
}

pub struct ReservationService<R: ReservationRepository + ?Sized> {
    repo: Arc<R>,
    rooms: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl<R: ReservationRepository + ?Sized> ReservationService<R> {
    pub fn new(repo: Arc<R>, rooms: Arc<dyn RoomRepository>) -> Self {
        Self::with_clock(repo, rooms, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: Arc<R>, rooms: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, rooms, clock }
    }

    pub async fn list(&self, filter: &ReservationFilter) -> Result<Vec<reservation::Model>, ServiceError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<reservation::Model, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::not_found(ENTITY))
    }

    /// Book a room. New reservations are `confirmed` with payment `pending`.
    #[instrument(skip(self, req), fields(room_id = ?req.room_id))]
    pub async fn create(&self, req: ReservationRequest) -> Result<reservation::Model, ServiceError> {
        let (Some(room_id), Some(check_in), Some(check_out), Some(total_amount)) =
            (req.room_id, req.check_in, req.check_out, req.total_amount)
        else {
            return Err(missing_fields());
        };
        if req.guest_name.trim().is_empty() || req.guest_email.trim().is_empty() {
            return Err(missing_fields());
        }
        check_stay(check_in, check_out)?;
        let room = self.rooms.get(room_id).await?.ok_or(ServiceError::not_found("Room"))?;

        let created = self
            .repo
            .create(NewReservation {
                guest_id: req.guest_id,
                guest_name: req.guest_name,
                guest_email: req.guest_email,
                room_id,
                room_number: req.room_number.unwrap_or(room.number),
                room_type: req.room_type.unwrap_or(room.room_type),
                check_in,
                check_out,
                total_amount,
                currency: req.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                number_of_guests: req.number_of_guests.unwrap_or(1),
                special_requests: req.special_requests,
            })
            .await?;
        info!(reservation_id = %created.id, room = %created.room_number, "reservation_created");
        Ok(created)
    }

    /// Apply the allow-listed subset of `body`. The resulting stay must
    /// still end after it starts.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: Uuid, body: &Value) -> Result<reservation::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut patch: ReservationPatch = patch::apply(RESERVATION_FIELDS, body)?;
        check_stay(patch.check_in.unwrap_or(existing.check_in), patch.check_out.unwrap_or(existing.check_out))?;
        if let Some(email) = patch.guest_email.take() {
            let email = email.trim().to_lowercase();
            if !email.contains('@') {
                return Err(ServiceError::Validation("invalid guest email".into()));
            }
            patch.guest_email = Some(email);
        }
        if patch.total_amount.is_some_and(|a| a < 0.0) || patch.number_of_guests.is_some_and(|n| n < 1) {
            return Err(ServiceError::Validation("total amount must be >= 0 and number of guests >= 1".into()));
        }
        self.write(id, &patch).await
    }

    /// Mark a reservation `cancelled`; the row is kept.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<reservation::Model, ServiceError> {
        self.get(id).await?;
        let patch = ReservationPatch { status: Some(STATUS_CANCELLED.to_string()), ..Default::default() };
        self.write(id, &patch).await
    }

    async fn write(&self, id: Uuid, patch: &ReservationPatch) -> Result<reservation::Model, ServiceError> {
        let updated = self.repo.update(id, patch, self.clock.now()).await?.ok_or(ServiceError::not_found(ENTITY))?;
        info!(reservation_id = %id, status = %updated.status, "reservation_updated");
        Ok(updated)
    }
}

fn missing_fields() -> ServiceError {
    ServiceError::MissingFields("Required fields: guest_name, guest_email, room_id, check_in, check_out, total_amount".into())
}
