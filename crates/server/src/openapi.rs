//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! Request types here only describe the wire shape; handlers deserialize
//! into the service-layer inputs.
#![allow(dead_code)]

use serde::Deserialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub timestamp: String }

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// guest (default), receptionist, housekeeping, maintenance or admin
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RoomStatusRequest {
    pub status: Option<String>,
    pub occupants: Option<i32>,
    pub guest_name: Option<String>,
    pub cleaning_status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub room_number: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub priority: Option<String>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub estimated_time: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub estimated_time: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateWorkOrderRequest {
    pub room_number: String,
    pub issue: String,
    pub category: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub estimated_cost: Option<f64>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
}

/// `assignee`, `assignee_name`, costs and `description` accept `null`.
#[derive(Deserialize, ToSchema)]
pub struct UpdateWorkOrderRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub guest_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub room_id: Uuid,
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    /// `YYYY-MM-DD`
    pub check_in: String,
    /// `YYYY-MM-DD`, after `check_in`
    pub check_out: String,
    pub total_amount: f64,
    pub currency: Option<String>,
    pub number_of_guests: Option<i32>,
    pub special_requests: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: Option<String>,
    pub total_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub number_of_guests: Option<i32>,
    pub special_requests: Option<Vec<String>>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::rooms::list,
        crate::routes::rooms::statistics,
        crate::routes::rooms::get,
        crate::routes::rooms::update_status,
        crate::routes::housekeeping::list,
        crate::routes::housekeeping::get,
        crate::routes::housekeeping::create,
        crate::routes::housekeeping::update,
        crate::routes::maintenance::list,
        crate::routes::maintenance::get,
        crate::routes::maintenance::create,
        crate::routes::maintenance::update,
        crate::routes::maintenance::delete,
        crate::routes::reservations::list,
        crate::routes::reservations::get,
        crate::routes::reservations::create,
        crate::routes::reservations::update,
        crate::routes::reservations::cancel,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            RoomStatusRequest,
            CreateTaskRequest,
            UpdateTaskRequest,
            CreateWorkOrderRequest,
            UpdateWorkOrderRequest,
            CreateReservationRequest,
            UpdateReservationRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "rooms"),
        (name = "housekeeping"),
        (name = "maintenance"),
        (name = "reservations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_auth_and_resource_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/auth/login"));
        assert!(paths.contains_key("/api/v1/rooms/{id}/status"));
        assert!(paths.contains_key("/api/v1/housekeeping/tasks/{id}"));
        assert!(paths.contains_key("/api/v1/maintenance/work-orders/{id}"));
        assert!(paths.contains_key("/api/v1/reservations"));
        assert!(doc.components.unwrap().security_schemes.contains_key("bearer"));
    }
}
