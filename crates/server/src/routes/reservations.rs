use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use common::types::ApiResponse;
use models::reservation;
use service::auth::domain::Role;
use service::reservations::{ReservationFilter, ReservationRequest};

use super::auth::{require_roles, CurrentUser, ServerState};
use super::rooms::parse_id;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};

/// Reads are open to any signed-in user; only the front desk books.
const MUTATORS: &[Role] = &[Role::Receptionist];

#[utoipa::path(get, path = "/api/v1/reservations", tag = "reservations", security(("bearer" = [])),
    params(("status" = Option<String>, Query, description = "Exact status match"), ("guestId" = Option<String>, Query, description = "Guest user id")),
    responses((status = 200, description = "Reservations, newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<ReservationFilter>,
) -> Result<Json<ApiResponse<Vec<reservation::Model>>>, JsonApiError> {
    Ok(Json(ApiResponse::ok(state.reservations.list(&filter).await?)))
}

#[utoipa::path(get, path = "/api/v1/reservations/{id}", tag = "reservations", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Reservation"), (status = 404, description = "RESERVATION_NOT_FOUND")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<reservation::Model>>, JsonApiError> {
    let id = parse_id(&id, "Reservation")?;
    Ok(Json(ApiResponse::ok(state.reservations.get(id).await?)))
}

#[utoipa::path(post, path = "/api/v1/reservations", tag = "reservations", security(("bearer" = [])),
    request_body = crate::openapi::CreateReservationRequest,
    responses((status = 201, description = "Created reservation"), (status = 400, description = "MISSING_FIELDS or VALIDATION_ERROR"), (status = 403, description = "Role not permitted"), (status = 404, description = "ROOM_NOT_FOUND")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<reservation::Model>>), JsonApiError> {
    require_roles(&user, MUTATORS)?;
    let created = state.reservations.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message(created, "Reservation created successfully"))))
}

#[utoipa::path(put, path = "/api/v1/reservations/{id}", tag = "reservations", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")), request_body = crate::openapi::UpdateReservationRequest,
    responses((status = 200, description = "Updated reservation"), (status = 400, description = "NO_VALID_FIELDS"), (status = 404, description = "RESERVATION_NOT_FOUND")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ApiResponse<reservation::Model>>, JsonApiError> {
    require_roles(&user, MUTATORS)?;
    let id = parse_id(&id, "Reservation")?;
    Ok(Json(ApiResponse::ok(state.reservations.update(id, &body).await?)))
}

/// `DELETE` cancels; the reservation stays on record.
#[utoipa::path(delete, path = "/api/v1/reservations/{id}", tag = "reservations", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Cancelled reservation"), (status = 404, description = "RESERVATION_NOT_FOUND")))]
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<reservation::Model>>, JsonApiError> {
    require_roles(&user, MUTATORS)?;
    let id = parse_id(&id, "Reservation")?;
    let cancelled = state.reservations.cancel(id).await?;
    Ok(Json(ApiResponse::with_message(cancelled, "Reservation cancelled successfully")))
}
