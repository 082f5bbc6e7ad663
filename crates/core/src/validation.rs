//! Field-level validation helpers shared by request DTOs.
//!
//! DTOs derive [`validator::Validate`]; failures are flattened into a
//! [`FieldErrors`] map (`field -> [message, ...]`) so the boundary can report
//! every offending field at once.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

use crate::categories::is_hex_color;
use crate::error::CoreError;

/// Message used for a required field that was omitted.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field name to list of human-readable messages, ordered by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten validator output into a [`FieldErrors`] map.
///
/// Errors without an explicit message fall back to their code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Run [`validator::Validate`] and convert failures into [`CoreError::InvalidFields`].
pub fn validate_fields<T: validator::Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidFields(field_errors(&errors)))
}

/// `validator` custom check for `#RRGGBB` colors.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some(Cow::Borrowed("Enter a color in #RRGGBB format."));
        Err(err)
    }
}
