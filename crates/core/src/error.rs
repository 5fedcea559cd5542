use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    /// No valid identity was presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A valid identity tried to touch a resource it does not own.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Build a field-level validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    /// Collapse derive-level validation errors into the first offending field
    /// (alphabetical, so the reported field is stable across runs).
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    (field.to_string(), message)
                })
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => Self::Validation { field, message },
            None => Self::validation("body", "Invalid request"),
        }
    }
}
