//! Validation utilities.

use crate::{FieldError, TodosError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `TodosError` on failure.
    fn validate_request(&self) -> Result<(), TodosError> {
        self.validate().map_err(validation_errors_to_todos_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
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
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Converts `validator::ValidationErrors` to `TodosError`.
///
/// The resulting message is the first reported message per field, so a
/// single failing rule reads exactly as its declared message.
#[must_use]
pub fn validation_errors_to_todos_error(errors: ValidationErrors) -> TodosError {
    let field_errors = field_errors(&errors);

    let mut messages: Vec<String> = Vec::with_capacity(field_errors.len());
    for error in &field_errors {
        if !messages.contains(&error.message) {
            messages.push(error.message.clone());
        }
    }

    TodosError::Validation(messages.join("; "))
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}
