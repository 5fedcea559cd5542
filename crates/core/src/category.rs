//! Category input validation.
//!
//! Categories are created and deleted but never edited, so the only input
//! shape is [`CreateCategory`].

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::text::reject_nul;

/// Color assigned when the client does not supply one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Request body for `POST /categories`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A validated category ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 7, message = "Color must be at most 7 characters"))]
    pub color: String,
}

impl TryFrom<CreateCategory> for NewCategory {
    type Error = CoreError;

    /// Trim the inputs, fill in the default color and check lengths.
    fn try_from(input: CreateCategory) -> Result<Self, Self::Error> {
        let name = input.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(CoreError::validation("name", "Name is required"));
        }

        let color = input
            .color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COLOR);

        reject_nul("name", name)?;
        reject_nul("color", color)?;

        let category = NewCategory {
            name: name.to_string(),
            color: color.to_string(),
        };
        category.validate()?;
        Ok(category)
    }
}
