use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::room;
use crate::clock::{Clock, SystemClock};
use crate::errors::ServiceError;
use crate::patch::{self, ROOM_STATUS_FIELDS};
use super::repository::{RoomFilter, RoomRepository, RoomStatusPatch};
use super::{STATUS_AVAILABLE, STATUS_CLEANING, STATUS_MAINTENANCE, STATUS_OCCUPIED};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatistics {
    pub total_rooms: usize,
    pub available_rooms: usize,
    pub occupied_rooms: usize,
    pub cleaning_rooms: usize,
    pub maintenance_rooms: usize,
    pub total_guests: i64,
    /// Percentage of rooms occupied, 0 when there are no rooms.
    pub occupancy_rate: f64,
    pub avg_daily_rate: f64,
    /// Guests in occupied rooms only.
    pub active_guests: i64,
}

impl RoomStatistics {
    pub fn from_rooms(rooms: &[room::Model]) -> Self {
        let count = |status: &str| rooms.iter().filter(|r| r.status == status).count();
        let total = rooms.len();
        let occupied = count(STATUS_OCCUPIED);
        let (occupancy_rate, avg_daily_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                occupied as f64 / total as f64 * 100.0,
                rooms.iter().map(|r| r.current_rate).sum::<f64>() / total as f64,
            )
        };
        Self {
            total_rooms: total,
            available_rooms: count(STATUS_AVAILABLE),
            occupied_rooms: occupied,
            cleaning_rooms: count(STATUS_CLEANING),
            maintenance_rooms: count(STATUS_MAINTENANCE),
            total_guests: rooms.iter().map(|r| i64::from(r.occupants)).sum(),
            occupancy_rate,
            avg_daily_rate,
            active_guests: rooms
                .iter()
                .filter(|r| r.status == STATUS_OCCUPIED)
                .map(|r| i64::from(r.occupants))
                .sum(),
        }
    }
}

pub struct RoomService<R: RoomRepository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: RoomRepository + ?Sized> RoomService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self::with_clock(repo, Arc::new(SystemClock)) }

    pub fn with_clock(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self { Self { repo, clock } }

    pub async fn list(&self, filter: &RoomFilter) -> Result<Vec<room::Model>, ServiceError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<room::Model, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::not_found("Room"))
    }

    pub async fn statistics(&self) -> Result<RoomStatistics, ServiceError> {
        let rooms = self.repo.list(&RoomFilter::default()).await?;
        Ok(RoomStatistics::from_rooms(&rooms))
    }

    /// Apply the allow-listed subset of `body` to a room.
    #[instrument(skip(self, body))]
    pub async fn update_status(&self, id: Uuid, body: &Value) -> Result<room::Model, ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("Room"));
        }
        let changes: RoomStatusPatch = patch::apply(ROOM_STATUS_FIELDS, body)?;
        let updated = self
            .repo
            .update_status(id, &changes, self.clock.now())
            .await?
            .ok_or(ServiceError::not_found("Room"))?;
        info!(room_id = %id, number = %updated.number, status = %updated.status, "room_status_updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::repository::mock::MockRoomRepository;
    use models::room::NewRoom;
    use serde_json::json;

    async fn seeded() -> (Arc<MockRoomRepository>, Vec<room::Model>) {
        let repo = Arc::new(MockRoomRepository::default());
        let mut rooms = Vec::new();
        for (n, rate) in [("101", 100.0), ("102", 200.0), ("103", 300.0), ("104", 400.0)] {
            rooms.push(repo.create(NewRoom { number: n.into(), room_type: "standard".into(), floor: 1, base_rate: rate, current_rate: None }).await.unwrap());
        }
        (repo, rooms)
    }

    #[tokio::test]
    async fn statistics_over_mixed_statuses() {
        let (repo, rooms) = seeded().await;
        let svc = RoomService::new(repo);
        svc.update_status(rooms[0].id, &json!({"status": "occupied", "occupants": 2})).await.unwrap();
        svc.update_status(rooms[1].id, &json!({"status": "cleaning", "occupants": 1})).await.unwrap();
        svc.update_status(rooms[2].id, &json!({"status": "maintenance"})).await.unwrap();

        let s = svc.statistics().await.unwrap();
        assert_eq!(s.total_rooms, 4);
        assert_eq!((s.available_rooms, s.occupied_rooms, s.cleaning_rooms, s.maintenance_rooms), (1, 1, 1, 1));
        assert_eq!(s.total_guests, 3);
        assert_eq!(s.active_guests, 2);
        assert!((s.occupancy_rate - 25.0).abs() < f64::EPSILON);
        assert!((s.avg_daily_rate - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn statistics_of_an_empty_hotel() {
        let s = RoomStatistics::from_rooms(&[]);
        assert_eq!(s.total_rooms, 0);
        assert_eq!(s.occupancy_rate, 0.0);
        assert_eq!(s.avg_daily_rate, 0.0);
    }

    #[tokio::test]
    async fn update_rejects_unknown_rooms_and_empty_patches() {
        let (repo, rooms) = seeded().await;
        let svc = RoomService::new(repo);
        let missing = svc.update_status(Uuid::new_v4(), &json!({"status": "occupied"})).await.unwrap_err();
        assert_eq!(missing.code(), "ROOM_NOT_FOUND");
        let empty = svc.update_status(rooms[0].id, &json!({"number": "999"})).await.unwrap_err();
        assert_eq!(empty.code(), "NO_VALID_FIELDS");
        assert_eq!(svc.get(rooms[0].id).await.unwrap().number, "101");
    }

    #[tokio::test]
    async fn get_unknown_room() {
        let (repo, _) = seeded().await;
        let err = RoomService::new(repo).get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Room")));
    }
}
