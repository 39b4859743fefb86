use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde_json::{json, Value};

use common::types::ApiResponse;
use service::auth::domain::{AuthSession, AuthUser, LoginInput, RefreshInput, RegisterInput, Role};
use service::auth::errors::AuthError;
use service::auth::policy::authorize;
use service::auth::repository::AuthRepository;
use service::auth::AuthService;
use service::housekeeping::{HousekeepingRepository, HousekeepingService};
use service::maintenance::{MaintenanceRepository, MaintenanceService};
use service::reservations::{ReservationRepository, ReservationService};
use service::rooms::{RoomRepository, RoomService};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;

/// Shared handler state. Services hold their repositories as trait objects
/// so the same router runs over SeaORM or the in-memory mocks.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub rooms: Arc<RoomService<dyn RoomRepository>>,
    pub housekeeping: Arc<HousekeepingService<dyn HousekeepingRepository>>,
    pub maintenance: Arc<MaintenanceService<dyn MaintenanceRepository>>,
    pub reservations: Arc<ReservationService<dyn ReservationRepository>>,
}

/// User resolved from the bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

/// Raw access token as presented, kept for logout.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Forbidden unless the user's role is listed (admin always passes).
pub fn require_roles(user: &AuthUser, roles: &[Role]) -> Result<(), JsonApiError> {
    if authorize(user, roles) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, role = %user.role, "forbidden");
        Err(AuthError::Forbidden.into())
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim()).filter(|t| !t.is_empty())
}

/// Bearer middleware: missing header or a non-Bearer scheme is
/// `UNAUTHORIZED`; otherwise the token goes through session validation.
pub async fn require_bearer(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    let Some(token) = bearer_token(&req).map(str::to_string) else {
        tracing::debug!(path = %req.uri().path(), "missing bearer token");
        return Err(AuthError::Unauthorized.into());
    };
    let user = state.auth.validate(&token).await?;
    req.extensions_mut().insert(CurrentUser(user));
    req.extensions_mut().insert(BearerToken(token));
    Ok(next.run(req).await)
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Missing fields, invalid role or duplicate email")))]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<(StatusCode, Json<ApiResponse<AuthUser>>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message(user, "User registered successfully"))))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Token pair and user"), (status = 400, description = "Missing credentials"), (status = 401, description = "Invalid credentials")))]
pub async fn login(State(state): State<ServerState>, ApiJson(input): ApiJson<LoginInput>) -> Result<Json<ApiResponse<AuthSession>>, JsonApiError> {
    let session = state.auth.authenticate(input).await?;
    Ok(Json(ApiResponse::with_message(session, "Login successful")))
}

#[utoipa::path(post, path = "/api/v1/auth/refresh", tag = "auth", request_body = crate::openapi::RefreshRequest,
    responses((status = 200, description = "New token pair"), (status = 401, description = "Invalid or stale refresh token")))]
pub async fn refresh(State(state): State<ServerState>, ApiJson(input): ApiJson<RefreshInput>) -> Result<Json<ApiResponse<AuthSession>>, JsonApiError> {
    let session = state.auth.refresh(input).await?;
    Ok(Json(ApiResponse::ok(session)))
}

#[utoipa::path(post, path = "/api/v1/auth/logout", tag = "auth", security(("bearer" = [])),
    responses((status = 200, description = "Session revoked"), (status = 401, description = "Unauthorized")))]
pub async fn logout(State(state): State<ServerState>, Extension(BearerToken(token)): Extension<BearerToken>) -> Result<Json<Value>, JsonApiError> {
    state.auth.revoke(&token).await?;
    Ok(Json(json!({"success": true, "message": "Logged out successfully"})))
}

#[utoipa::path(get, path = "/api/v1/auth/me", tag = "auth", security(("bearer" = [])),
    responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<ApiResponse<AuthUser>> {
    Json(ApiResponse::ok(user))
}
