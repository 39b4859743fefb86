use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use common::types::ApiResponse;
use models::room;
use service::auth::domain::Role;
use service::errors::ServiceError;
use service::rooms::{RoomFilter, RoomStatistics};

use super::auth::{require_roles, CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};

pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::not_found(entity).into())
}

#[utoipa::path(get, path = "/api/v1/rooms", tag = "rooms", security(("bearer" = [])),
    params(("status" = Option<String>, Query, description = "Exact status match"), ("floor" = Option<i32>, Query, description = "Floor number"), ("type" = Option<String>, Query, description = "Room type")),
    responses((status = 200, description = "Rooms ordered by number")))]
pub async fn list(State(state): State<ServerState>, ApiQuery(filter): ApiQuery<RoomFilter>) -> Result<Json<ApiResponse<Vec<room::Model>>>, JsonApiError> {
    Ok(Json(ApiResponse::ok(state.rooms.list(&filter).await?)))
}

#[utoipa::path(get, path = "/api/v1/rooms/statistics", tag = "rooms", security(("bearer" = [])),
    responses((status = 200, description = "Occupancy and rate figures")))]
pub async fn statistics(State(state): State<ServerState>) -> Result<Json<ApiResponse<RoomStatistics>>, JsonApiError> {
    Ok(Json(ApiResponse::ok(state.rooms.statistics().await?)))
}

#[utoipa::path(get, path = "/api/v1/rooms/{id}", tag = "rooms", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Room"), (status = 404, description = "ROOM_NOT_FOUND")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<room::Model>>, JsonApiError> {
    let id = parse_id(&id, "Room")?;
    Ok(Json(ApiResponse::ok(state.rooms.get(id).await?)))
}

#[utoipa::path(put, path = "/api/v1/rooms/{id}/status", tag = "rooms", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")), request_body = crate::openapi::RoomStatusRequest,
    responses((status = 200, description = "Updated room"), (status = 400, description = "NO_VALID_FIELDS"), (status = 403, description = "Role not permitted"), (status = 404, description = "ROOM_NOT_FOUND")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ApiResponse<room::Model>>, JsonApiError> {
    require_roles(&user, &[Role::Receptionist, Role::Housekeeping])?;
    let id = parse_id(&id, "Room")?;
    Ok(Json(ApiResponse::ok(state.rooms.update_status(id, &body).await?)))
}
