use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::reservation::{self, NewReservation};
use crate::errors::{db_err, ServiceError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<String>,
    #[serde(rename = "guestId")]
    pub guest_id: Option<Uuid>,
}

impl ReservationFilter {
    pub fn matches(&self, r: &reservation::Model) -> bool {
        self.status.as_ref().map_or(true, |s| &r.status == s)
            && self.guest_id.map_or(true, |g| r.guest_id == Some(g))
    }
}

/// Client-editable reservation fields. All backing columns are required,
/// so none of them can be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub status: Option<String>,
    pub total_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub number_of_guests: Option<i32>,
    pub special_requests: Option<Vec<String>>,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<reservation::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<reservation::Model>, ServiceError>;
    async fn create(&self, input: NewReservation) -> Result<reservation::Model, ServiceError>;
    async fn update(&self, id: Uuid, patch: &ReservationPatch, at: DateTime<Utc>) -> Result<Option<reservation::Model>, ServiceError>;
}

pub struct SeaOrmReservationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<reservation::Model>, ServiceError> {
        let mut q = reservation::Entity::find();
        if let Some(s) = &filter.status { q = q.filter(reservation::Column::Status.eq(s.as_str())); }
        if let Some(g) = filter.guest_id { q = q.filter(reservation::Column::GuestId.eq(g)); }
        q.order_by_desc(reservation::Column::CreatedAt).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<reservation::Model>, ServiceError> {
        reservation::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn create(&self, input: NewReservation) -> Result<reservation::Model, ServiceError> {
        Ok(reservation::create(&self.db, input).await?)
    }

    async fn update(&self, id: Uuid, patch: &ReservationPatch, at: DateTime<Utc>) -> Result<Option<reservation::Model>, ServiceError> {
        let Some(found) = self.get(id).await? else { return Ok(None) };
        let mut am: reservation::ActiveModel = found.into();
        if let Some(v) = &patch.guest_name { am.guest_name = Set(v.clone()); }
        if let Some(v) = &patch.guest_email { am.guest_email = Set(v.clone()); }
        if let Some(v) = patch.check_in { am.check_in = Set(v); }
        if let Some(v) = patch.check_out { am.check_out = Set(v); }
        if let Some(v) = &patch.status { am.status = Set(v.clone()); }
        if let Some(v) = patch.total_amount { am.total_amount = Set(v); }
        if let Some(v) = &patch.payment_status { am.payment_status = Set(v.clone()); }
        if let Some(v) = patch.number_of_guests { am.number_of_guests = Set(v); }
        if let Some(v) = &patch.special_requests { am.special_requests = Set(serde_json::json!(v)); }
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
    pub struct MockReservationRepository {
        reservations: Mutex<HashMap<Uuid, reservation::Model>>,
    }

    fn poisoned<T>(_: T) -> ServiceError {
        ServiceError::Db("mock store lock poisoned".into())
    }

    #[async_trait]
    impl ReservationRepository for MockReservationRepository {
        async fn list(&self, filter: &ReservationFilter) -> Result<Vec<reservation::Model>, ServiceError> {
            let all = self.reservations.lock().map_err(poisoned)?;
            let mut out: Vec<_> = all.values().filter(|r| filter.matches(r)).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<reservation::Model>, ServiceError> {
            Ok(self.reservations.lock().map_err(poisoned)?.get(&id).cloned())
        }

        async fn create(&self, input: NewReservation) -> Result<reservation::Model, ServiceError> {
            input.validate()?;
            let now = Utc::now().into();
            let r = reservation::Model {
                id: Uuid::new_v4(),
                guest_id: input.guest_id,
                guest_name: input.guest_name.trim().to_string(),
                guest_email: input.guest_email.trim().to_lowercase(),
                room_id: input.room_id,
                room_number: input.room_number,
                room_type: input.room_type,
                check_in: input.check_in,
                check_out: input.check_out,
                status: reservation::STATUS_CONFIRMED.to_string(),
                total_amount: input.total_amount,
                currency: input.currency,
                payment_status: reservation::PAYMENT_PENDING.to_string(),
                number_of_guests: input.number_of_guests,
                special_requests: serde_json::json!(input.special_requests),
                created_at: now,
                updated_at: now,
            };
            self.reservations.lock().map_err(poisoned)?.insert(r.id, r.clone());
            Ok(r)
        }

        async fn update(&self, id: Uuid, patch: &ReservationPatch, at: DateTime<Utc>) -> Result<Option<reservation::Model>, ServiceError> {
            let mut all = self.reservations.lock().map_err(poisoned)?;
            Ok(all.get_mut(&id).map(|r| {
                if let Some(v) = &patch.guest_name { r.guest_name = v.clone(); }
                if let Some(v) = &patch.guest_email { r.guest_email = v.clone(); }
                if let Some(v) = patch.check_in { r.check_in = v; }
                if let Some(v) = patch.check_out { r.check_out = v; }
                if let Some(v) = &patch.status { r.status = v.clone(); }
                if let Some(v) = patch.total_amount { r.total_amount = v; }
                if let Some(v) = &patch.payment_status { r.payment_status = v.clone(); }
                if let Some(v) = patch.number_of_guests { r.number_of_guests = v; }
                if let Some(v) = &patch.special_requests { r.special_requests = serde_json::json!(v); }
                r.updated_at = at.into();
                r.clone()
            }))
        }
    }
}
