use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::types::ApiErrorResponse;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::patch::PatchError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error half of every JSON endpoint; renders `{success: false, error: {code, message}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status, code: code.into(), message: message.into() }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorResponse::new(self.code, self.message))).into_response()
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        if e.is_internal() {
            error!(error = %e, "auth internal error");
            return Self::internal();
        }
        let status = match e {
            AuthError::MissingCredentials
            | AuthError::MissingFields(_)
            | AuthError::MissingRefreshToken
            | AuthError::Validation(_)
            | AuthError::InvalidRole(_)
            | AuthError::UserExists => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_internal() {
            error!(error = %e, "service internal error");
            return Self::internal();
        }
        let status = match &e {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Model(ModelError::Conflict(_)) => StatusCode::CONFLICT,
            ServiceError::Validation(_)
            | ServiceError::MissingFields(_)
            | ServiceError::Patch(_)
            | ServiceError::Model(_)
            | ServiceError::Db(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "request body rejected");
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", rejection.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", rejection.body_text())
    }
}

impl From<PatchError> for JsonApiError {
    fn from(e: PatchError) -> Self {
        ServiceError::from(e).into()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
