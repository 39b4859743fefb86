#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::{self, ServerState};
use service::auth::password::PasswordHashing;
use service::auth::repository::{mock::MockAuthRepository, AuthRepository};
use service::auth::{AuthConfig, AuthService};
use service::clock::ManualClock;
use service::housekeeping::repository::mock::MockHousekeepingRepository;
use service::housekeeping::{HousekeepingRepository, HousekeepingService};
use service::maintenance::repository::mock::MockMaintenanceRepository;
use service::maintenance::{MaintenanceRepository, MaintenanceService};
use service::reservations::repository::mock::MockReservationRepository;
use service::reservations::{ReservationRepository, ReservationService};
use service::rooms::repository::mock::MockRoomRepository;
use service::rooms::{RoomRepository, RoomService};

pub const PREFIX: &str = "/api/v1";

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub auth_repo: Arc<MockAuthRepository>,
    pub rooms_repo: Arc<MockRoomRepository>,
    pub tasks_repo: Arc<MockHousekeepingRepository>,
    pub orders_repo: Arc<MockMaintenanceRepository>,
    pub bookings_repo: Arc<MockReservationRepository>,
}

pub fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth_repo = Arc::new(MockAuthRepository::default());
    let rooms_repo = Arc::new(MockRoomRepository::default());
    let tasks_repo = Arc::new(MockHousekeepingRepository::default());
    let orders_repo = Arc::new(MockMaintenanceRepository::default());
    let bookings_repo = Arc::new(MockReservationRepository::default());
    let cfg = AuthConfig { password: PasswordHashing::minimal(), ..AuthConfig::new("test-secret", "test-refresh-secret") };
    let auth_dyn: Arc<dyn AuthRepository> = auth_repo.clone();
    let rooms_dyn: Arc<dyn RoomRepository> = rooms_repo.clone();
    let tasks_dyn: Arc<dyn HousekeepingRepository> = tasks_repo.clone();
    let orders_dyn: Arc<dyn MaintenanceRepository> = orders_repo.clone();
    let bookings_dyn: Arc<dyn ReservationRepository> = bookings_repo.clone();
    let state = ServerState {
        auth: Arc::new(AuthService::with_clock(auth_dyn, cfg, clock.clone())),
        rooms: Arc::new(RoomService::with_clock(rooms_dyn.clone(), clock.clone())),
        housekeeping: Arc::new(HousekeepingService::with_clock(tasks_dyn, clock.clone())),
        maintenance: Arc::new(MaintenanceService::with_clock(orders_dyn, clock.clone())),
        reservations: Arc::new(ReservationService::with_clock(bookings_dyn, rooms_dyn, clock.clone())),
    };
    let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive(), PREFIX);
    TestApp { router, clock, auth_repo, rooms_repo, tasks_repo, orders_repo, bookings_repo }
}

impl TestApp {
    /// Send one request; returns status and parsed JSON body (`Null` when empty).
    pub async fn send(&self, method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(format!("{PREFIX}{path}"));
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
            None => req.body(Body::empty())?,
        };
        self.raw(req).await
    }

    pub async fn raw(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    pub async fn register(&self, email: &str, role: &str) -> anyhow::Result<Value> {
        let (status, body) = self
            .send("POST", "/auth/register", None, Some(json!({"name": "Staff", "email": email, "password": "pw123", "role": role})))
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        Ok(body)
    }

    /// Register then log in; returns `(access, refresh)`.
    pub async fn login_as(&self, email: &str, role: &str) -> anyhow::Result<(String, String)> {
        self.register(email, role).await?;
        let (status, body) = self.send("POST", "/auth/login", None, Some(json!({"email": email, "password": "pw123"}))).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
        let refresh = body["data"]["refreshToken"].as_str().unwrap_or_default().to_string();
        Ok((token, refresh))
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
