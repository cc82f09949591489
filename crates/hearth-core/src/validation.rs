//! Validation utilities.

use crate::{FieldError, HearthError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `HearthError` on failure.
    fn validate_request(&self) -> Result<(), HearthError> {
        self.validate().map_err(validation_errors_to_hearth_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `HearthError`.
#[must_use]
pub fn validation_errors_to_hearth_error(errors: ValidationErrors) -> HearthError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    HearthError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use chrono::NaiveDate;
    use std::borrow::Cow;
    use validator::ValidationError;

    /// Calendar date format accepted in search requests.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Validates an optional `YYYY-MM-DD` date; the empty string means "absent".
    pub fn iso_date(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
            return Ok(());
        }
        Err(ValidationError::new("invalid_date")
            .with_message(Cow::Borrowed("expected a date formatted as YYYY-MM-DD")))
    }

    /// Validates a string holding a positive (>= 1) integer.
    pub fn positive_integer(value: &str) -> Result<(), ValidationError> {
        match value.trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(()),
            Ok(_) => Err(ValidationError::new("not_positive")
                .with_message(Cow::Borrowed("must be a positive integer"))),
            Err(_) => Err(ValidationError::new("not_an_integer")
                .with_message(Cow::Borrowed("must be an integer"))),
        }
    }

    /// Validates an optional integer identifier; the empty string means "absent".
    pub fn optional_identifier(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || value.trim().parse::<i64>().is_ok() {
            return Ok(());
        }
        Err(ValidationError::new("invalid_identifier")
            .with_message(Cow::Borrowed("must be an integer identifier")))
    }
}
