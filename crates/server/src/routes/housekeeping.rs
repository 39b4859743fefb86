use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use common::types::ApiResponse;
use models::housekeeping_task::{self as task, NewTask};
use service::auth::domain::Role;
use service::housekeeping::TaskFilter;

use super::auth::{require_roles, CurrentUser, ServerState};
use super::rooms::parse_id;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};

const READERS: &[Role] = &[Role::Housekeeping];
const CREATORS: &[Role] = &[Role::Housekeeping, Role::Receptionist];

#[utoipa::path(get, path = "/api/v1/housekeeping/tasks", tag = "housekeeping", security(("bearer" = [])),
    params(("status" = Option<String>, Query, description = "Exact status match"), ("priority" = Option<String>, Query, description = "Exact priority match")),
    responses((status = 200, description = "Tasks, newest first"), (status = 403, description = "Role not permitted")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<TaskFilter>,
) -> Result<Json<ApiResponse<Vec<task::Model>>>, JsonApiError> {
    require_roles(&user, READERS)?;
    Ok(Json(ApiResponse::ok(state.housekeeping.list(&filter).await?)))
}

#[utoipa::path(get, path = "/api/v1/housekeeping/tasks/{id}", tag = "housekeeping", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Task"), (status = 404, description = "TASK_NOT_FOUND")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<task::Model>>, JsonApiError> {
    require_roles(&user, READERS)?;
    let id = parse_id(&id, "Task")?;
    Ok(Json(ApiResponse::ok(state.housekeeping.get(id).await?)))
}

#[utoipa::path(post, path = "/api/v1/housekeeping/tasks", tag = "housekeeping", security(("bearer" = [])),
    request_body = crate::openapi::CreateTaskRequest,
    responses((status = 201, description = "Created task"), (status = 400, description = "MISSING_FIELDS"), (status = 403, description = "Role not permitted")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<NewTask>,
) -> Result<(StatusCode, Json<ApiResponse<task::Model>>), JsonApiError> {
    require_roles(&user, CREATORS)?;
    let created = state.housekeeping.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(put, path = "/api/v1/housekeeping/tasks/{id}", tag = "housekeeping", security(("bearer" = [])),
    params(("id" = String, Path, description = "Record id")), request_body = crate::openapi::UpdateTaskRequest,
    responses((status = 200, description = "Updated task"), (status = 400, description = "NO_VALID_FIELDS"), (status = 404, description = "TASK_NOT_FOUND")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ApiResponse<task::Model>>, JsonApiError> {
    require_roles(&user, READERS)?;
    let id = parse_id(&id, "Task")?;
    Ok(Json(ApiResponse::ok(state.housekeeping.update(id, &body).await?)))
}
