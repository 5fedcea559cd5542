//! Checks on free-text input that length rules do not cover.

use crate::error::CoreError;

/// PostgreSQL `TEXT` cannot store U+0000, so such input is a field error.
pub fn reject_nul(field: &str, value: &str) -> Result<(), CoreError> {
    if value.contains('\0') {
        return Err(CoreError::validation(
            field,
            "Must not contain NUL characters",
        ));
    }
    Ok(())
}
