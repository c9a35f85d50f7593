//! Field-level validation of incoming payloads.
//!
//! Payload types declare their rules with `validator` derives; this module turns the
//! collected failures into the `field -> message` map returned to clients.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::shared::AppError;

pub type Violations = BTreeMap<String, String>;

/// Runs every rule on the candidate and returns all violations, keyed by field name.
/// An empty map means the candidate is valid.
pub fn violations<T: Validate>(candidate: &T) -> Violations {
    match candidate.validate() {
        Ok(()) => Violations::new(),
        Err(errors) => errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                errors
                    .first()
                    .map(|error| (field.to_string(), describe(error)))
            })
            .collect(),
    }
}

/// Like [`violations`], but as a `Result` ready for `?`
pub fn validate<T: Validate>(candidate: &T) -> Result<(), AppError> {
    let violations = violations(candidate);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

/// Decodes an explicit `null` as the type's default, same as an absent field.
///
/// Use with `#[serde(default, deserialize_with = "...")]` so the field reaches validation
/// instead of failing the whole payload.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn describe(error: &ValidationError) -> String {
    // An empty value fails "required" no matter which rule caught it
    let blank = match error.params.get("value") {
        Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) | None => false,
    };
    if blank || error.code == "required" {
        return "This field is required".to_string();
    }

    match error.code.as_ref() {
        "length" => match error.params.get("min") {
            Some(min) => format!("This field must be longer than {} characters", min),
            None => "This field has an invalid length".to_string(),
        },
        "email" => "Not a valid email address".to_string(),
        code => format!("failed on the '{}' rule", code),
    }
}
