use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use common::types::ApiResponse;
use models::work_order::{self, NewWorkOrder};
use service::auth::domain::Role;
use service::maintenance::WorkOrderFilter;

use super::auth::{require_roles, CurrentUser, ServerState};
use super::rooms::parse_id;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};

const READERS: &[Role] = &[Role::Maintenance];
/// Anyone who walks the floors can report a fault.
const REPORTERS: &[Role] = &[Role::Maintenance, Role::Receptionist, Role::Housekeeping];

#[utoipa::path(get, path = "/api/v1/maintenance/work-orders", tag = "maintenance", security(("bearer" = [])),
    params(("status" = Option<String>, Query, description = "Exact status match"), ("priority" = Option<String>, Query, description = "Exact priority match")),
    responses((status = 200, description = "Work orders, newest first"), (status = 403, description = "Role not permitted")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<WorkOrderFilter>,
) -> Result<Json<ApiResponse<Vec<work_order::Model>>>, JsonApiError> {
    require_roles(&user, READERS)?;
    Ok(Json(ApiResponse::ok(state.maintenance.list(&filter).await?)))
}

#[utoipa::path(get, path = "/api/v1/maintenance/work-orders/{id}", tag = "maintenance", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Work order"), (status = 404, description = "WORK_ORDER_NOT_FOUND")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<work_order::Model>>, JsonApiError> {
    require_roles(&user, READERS)?;
    let id = parse_id(&id, "Work order")?;
    Ok(Json(ApiResponse::ok(state.maintenance.get(id).await?)))
}

#[utoipa::path(post, path = "/api/v1/maintenance/work-orders", tag = "maintenance", security(("bearer" = [])),
    request_body = crate::openapi::CreateWorkOrderRequest,
    responses((status = 201, description = "Created work order"), (status = 400, description = "MISSING_FIELDS"), (status = 403, description = "Role not permitted")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<NewWorkOrder>,
) -> Result<(StatusCode, Json<ApiResponse<work_order::Model>>), JsonApiError> {
    require_roles(&user, REPORTERS)?;
    let created = state.maintenance.create(input, user.id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(put, path = "/api/v1/maintenance/work-orders/{id}", tag = "maintenance", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")), request_body = crate::openapi::UpdateWorkOrderRequest,
    responses((status = 200, description = "Updated work order"), (status = 400, description = "NO_VALID_FIELDS"), (status = 404, description = "WORK_ORDER_NOT_FOUND")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ApiResponse<work_order::Model>>, JsonApiError> {
    require_roles(&user, READERS)?;
    let id = parse_id(&id, "Work order")?;
    Ok(Json(ApiResponse::ok(state.maintenance.update(id, &body).await?)))
}

#[utoipa::path(delete, path = "/api/v1/maintenance/work-orders/{id}", tag = "maintenance", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "WORK_ORDER_NOT_FOUND")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    require_roles(&user, READERS)?;
    let id = parse_id(&id, "Work order")?;
    state.maintenance.delete(id).await?;
    Ok(Json(json!({"success": true, "message": "Work order deleted successfully"})))
}
