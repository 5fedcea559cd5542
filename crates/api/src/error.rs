use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskflow_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request body that could not be read as JSON at all.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine code, message and offending field of an error response.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<String>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field: None,
        }
    }

    fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "VALIDATION_ERROR",
            message: message.into(),
            field: Some(field.into()),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
                }
                CoreError::Validation { field, message } => {
                    ErrorParts::validation(field.clone(), message.clone())
                }
                CoreError::Unauthorized(msg) => {
                    ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(field) = parts.field {
            body["field"] = json!(field);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    /// Unreadable JSON is a 400; JSON of the wrong shape is a field error on `body`.
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Core(CoreError::validation("body", err.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Classify a sqlx error into a response.
///
/// - FK violations on `fk_tasks_category` (23503) are a 422 on `category_id`:
///   the category vanished or belongs to someone else.
/// - Check violations (23514) are a 422 on the column the constraint guards.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23503") if constraint == "fk_tasks_category" => {
                    ErrorParts::validation("category_id", "Category not found")
                }
                Some("23514") => {
                    let field = checked_field(constraint);
                    ErrorParts::validation(field, format!("Invalid value for '{field}'"))
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorParts::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}

/// Map a `ck_<table>_<column>[_length]` constraint name to its column.
fn checked_field(constraint: &str) -> &str {
    let column = constraint
        .strip_prefix("ck_categories_")
        .or_else(|| constraint.strip_prefix("ck_tasks_"))
        .unwrap_or("body");
    column.strip_suffix("_length").unwrap_or(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_field_strips_table_and_suffix() {
        assert_eq!(checked_field("ck_categories_name_length"), "name");
        assert_eq!(checked_field("ck_categories_color_length"), "color");
        assert_eq!(checked_field("ck_tasks_title_length"), "title");
        assert_eq!(checked_field("ck_tasks_priority"), "priority");
        assert_eq!(checked_field("something_else"), "body");
    }
}
