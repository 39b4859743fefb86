use std::{net::SocketAddr, sync::Arc};

use axum::http::HeaderValue;
use axum::Router;
use chrono::Duration;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use configs::{AppConfig, AuthSettings};
use service::auth::password::PasswordHashing;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::housekeeping::{HousekeepingRepository, HousekeepingService, SeaOrmHousekeepingRepository};
use service::maintenance::{MaintenanceRepository, MaintenanceService, SeaOrmMaintenanceRepository};
use service::reservations::{ReservationRepository, ReservationService, SeaOrmReservationRepository};
use service::rooms::{RoomRepository, RoomService, SeaOrmRoomRepository};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Permissive when no origins are configured.
pub fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

fn ttl(secs: u64, name: &str) -> anyhow::Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| anyhow::anyhow!("{name} of {secs}s is out of range"))
}

/// Translate configuration into the service-layer auth settings.
pub fn auth_config(settings: &AuthSettings) -> anyhow::Result<AuthConfig> {
    Ok(AuthConfig {
        jwt_secret: settings.jwt_secret.clone(),
        refresh_token_secret: settings.refresh_token_secret.clone(),
        access_ttl: ttl(settings.access_ttl_secs()?, "access_token_ttl")?,
        refresh_ttl: ttl(settings.refresh_ttl_secs()?, "refresh_token_ttl")?,
        password: PasswordHashing {
            memory_kib: settings.argon2_memory_kib,
            iterations: settings.argon2_iterations,
            parallelism: settings.argon2_parallelism,
        },
    })
}

/// Wire the SeaORM repositories into the services.
pub fn build_state(db: DatabaseConnection, auth: AuthConfig) -> ServerState {
    let auth_repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let rooms_repo: Arc<dyn RoomRepository> = Arc::new(SeaOrmRoomRepository { db: db.clone() });
    let tasks_repo: Arc<dyn HousekeepingRepository> = Arc::new(SeaOrmHousekeepingRepository { db: db.clone() });
    let orders_repo: Arc<dyn MaintenanceRepository> = Arc::new(SeaOrmMaintenanceRepository { db: db.clone() });
    let bookings_repo: Arc<dyn ReservationRepository> = Arc::new(SeaOrmReservationRepository { db });
    ServerState {
        auth: Arc::new(AuthService::new(auth_repo, auth)),
        rooms: Arc::new(RoomService::new(rooms_repo.clone())),
        housekeeping: Arc::new(HousekeepingService::new(tasks_repo)),
        maintenance: Arc::new(MaintenanceService::new(orders_repo)),
        reservations: Arc::new(ReservationService::new(bookings_repo, rooms_repo)),
    }
}

/// Public entry: load configuration, prepare the database, serve HTTP.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_database_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let state = build_state(db, auth_config(&cfg.auth)?);
    let app: Router = routes::build_router(state, build_cors(&cfg.server.allowed_origins), &cfg.server.api_prefix);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, api_prefix = %cfg.server.api_prefix, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_follows_settings() {
        let settings = AuthSettings {
            jwt_secret: "a".into(),
            refresh_token_secret: "b".into(),
            access_token_ttl: "15m".into(),
            refresh_token_ttl: "2d".into(),
            ..Default::default()
        };
        let cfg = auth_config(&settings).unwrap();
        assert_eq!(cfg.access_ttl, Duration::minutes(15));
        assert_eq!(cfg.refresh_ttl, Duration::days(2));
        assert_eq!(cfg.password.memory_kib, settings.argon2_memory_kib);
    }

    #[test]
    fn out_of_range_lifetime_is_an_error_not_a_panic() {
        let settings = AuthSettings {
            jwt_secret: "a".into(),
            refresh_token_secret: "b".into(),
            access_token_ttl: "1000000000000000000".into(),
            ..Default::default()
        };
        let err = auth_config(&settings).err().unwrap();
        assert!(err.to_string().contains("access_token_ttl"));
    }
}
