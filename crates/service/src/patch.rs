//! Partial updates driven by a field allow-list.
//!
//! Each mutable resource declares which keys of a JSON patch it accepts.
//! [`accepted_fields`] keeps only those keys; [`apply`] then reads the kept
//! subset into a typed patch struct.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const ROOM_STATUS_FIELDS: &[&str] = &["status", "occupants", "guest_name", "cleaning_status"];
pub const HOUSEKEEPING_TASK_FIELDS: &[&str] = &["status", "priority", "assignee", "assignee_name", "estimated_time"];
pub const WORK_ORDER_FIELDS: &[&str] =
    &["status", "priority", "assignee", "assignee_name", "estimated_cost", "actual_cost", "description"];
pub const RESERVATION_FIELDS: &[&str] = &[
    "guest_name",
    "guest_email",
    "check_in",
    "check_out",
    "status",
    "total_amount",
    "payment_status",
    "number_of_guests",
    "special_requests",
];

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("No valid fields to update")]
    NoValidFields,
    #[error("update body must be a JSON object")]
    NotAnObject,
    #[error("invalid field value: {0}")]
    InvalidValue(String),
}

/// Subset of `patch` whose keys appear in `allowed`. Unknown keys are
/// dropped silently; an empty result is an error.
pub fn accepted_fields(allowed: &[&str], patch: &Value) -> Result<Map<String, Value>, PatchError> {
    let obj = patch.as_object().ok_or(PatchError::NotAnObject)?;
    let kept: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| allowed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if kept.is_empty() {
        return Err(PatchError::NoValidFields);
    }
    Ok(kept)
}

pub fn apply<T: DeserializeOwned>(allowed: &[&str], patch: &Value) -> Result<T, PatchError> {
    let kept = accepted_fields(allowed, patch)?;
    serde_json::from_value(Value::Object(kept)).map_err(|e| PatchError::InvalidValue(e.to_string()))
}

/// Distinguishes "absent" (`None`) from "set to null" (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_allowed_keys() {
        let kept = accepted_fields(ROOM_STATUS_FIELDS, &json!({"status": "occupied", "number": "999", "base_rate": 1})).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept["status"], "occupied");
    }

    #[test]
    fn nothing_allowed_is_an_error() {
        assert_eq!(accepted_fields(ROOM_STATUS_FIELDS, &json!({"number": "1"})), Err(PatchError::NoValidFields));
        assert_eq!(accepted_fields(ROOM_STATUS_FIELDS, &json!({})), Err(PatchError::NoValidFields));
        assert_eq!(accepted_fields(ROOM_STATUS_FIELDS, &json!(["status"])), Err(PatchError::NotAnObject));
    }

    #[derive(Debug, Deserialize)]
    struct StatusBody {
        #[serde(default, deserialize_with = "nullable")]
        guest_name: Option<Option<String>>,
        occupants: Option<i32>,
    }

    #[test]
    fn null_and_absent_differ() {
        let cleared: StatusBody = apply(ROOM_STATUS_FIELDS, &json!({"guest_name": null})).unwrap();
        assert_eq!(cleared.guest_name, Some(None));
        let untouched: StatusBody = apply(ROOM_STATUS_FIELDS, &json!({"occupants": 2})).unwrap();
        assert_eq!(untouched.guest_name, None);
        assert_eq!(untouched.occupants, Some(2));
    }

    #[test]
    fn wrong_types_are_invalid_values() {
        let err = apply::<StatusBody>(ROOM_STATUS_FIELDS, &json!({"occupants": "two"})).unwrap_err();
        assert!(matches!(err, PatchError::InvalidValue(_)));
    }
}
