pub mod auth;
pub mod housekeeping;
pub mod maintenance;
pub mod reservations;
pub mod rooms;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
pub use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok", timestamp: chrono::Utc::now().to_rfc3339() })
}

async fn not_found() -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found")
}

/// Build the full application router.
///
/// `/health` and the docs sit at the root; everything else is nested under
/// `api_prefix`. Routes behind the bearer check see `CurrentUser` and
/// `BearerToken` in request extensions.
pub fn build_router(state: ServerState, cors: CorsLayer, api_prefix: &str) -> Router {
    // Public auth routes
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    // Protected routes; role checks happen per handler
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/rooms", get(rooms::list))
        .route("/rooms/statistics", get(rooms::statistics))
        .route("/rooms/:id", get(rooms::get))
        .route("/rooms/:id/status", put(rooms::update_status))
        .route("/housekeeping/tasks", get(housekeeping::list).post(housekeeping::create))
        .route("/housekeeping/tasks/:id", get(housekeeping::get).put(housekeeping::update))
        .route("/maintenance/work-orders", get(maintenance::list).post(maintenance::create))
        .route(
            "/maintenance/work-orders/:id",
            get(maintenance::get).put(maintenance::update).delete(maintenance::delete),
        )
        .route("/reservations", get(reservations::list).post(reservations::create))
        .route("/reservations/:id", get(reservations::get).put(reservations::update).delete(reservations::cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    let api = public.merge(protected);
    let root = Router::new().route("/health", get(health));
    let root = if api_prefix.is_empty() { root.merge(api) } else { root.nest(api_prefix, api) };

    root.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
