use thiserror::Error;

use models::errors::ModelError;
use crate::patch::PatchError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    MissingFields(String),
    /// Carries the entity name, e.g. `"Room"` or `"Work order"`.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str) -> Self { Self::NotFound(entity) }

    pub fn code(&self) -> String {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR".into(),
            ServiceError::MissingFields(_) => "MISSING_FIELDS".into(),
            ServiceError::NotFound(entity) => format!("{}_NOT_FOUND", entity.to_uppercase().replace(' ', "_")),
            ServiceError::Model(ModelError::Validation(_)) => "VALIDATION_ERROR".into(),
            ServiceError::Model(ModelError::Conflict(_)) => "CONFLICT".into(),
            ServiceError::Patch(PatchError::NoValidFields) => "NO_VALID_FIELDS".into(),
            ServiceError::Patch(_) => "VALIDATION_ERROR".into(),
            ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)) => "INTERNAL_ERROR".into(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)))
    }
}

pub(crate) fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(ServiceError::not_found("Room").code(), "ROOM_NOT_FOUND");
        assert_eq!(ServiceError::not_found("Task").to_string(), "Task not found");
        assert_eq!(ServiceError::not_found("Work order").code(), "WORK_ORDER_NOT_FOUND");
        assert_eq!(ServiceError::not_found("Work order").to_string(), "Work order not found");
        assert_eq!(ServiceError::from(PatchError::NoValidFields).code(), "NO_VALID_FIELDS");
        assert_eq!(ServiceError::from(PatchError::NoValidFields).to_string(), "No valid fields to update");
        assert!(ServiceError::Db("boom".into()).is_internal());
        assert_eq!(ServiceError::Db("boom".into()).code(), "INTERNAL_ERROR");
    }
}
