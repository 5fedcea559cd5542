//! Category rows.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::ownership::Owned;
use taskflow_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Category {
    const ENTITY: &'static str = "Category";

    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// A category annotated with the number of tasks referencing it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    pub task_count: i64,
}
