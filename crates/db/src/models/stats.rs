//! Aggregate report over one user's tasks.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::types::DbId;

/// Task counts per priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

/// Task count for one category. `category_id = None` groups uncategorized tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryCount {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub count: i64,
}

/// Response payload for `GET /tasks/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    /// Percentage of completed tasks, one decimal place.
    pub completion_rate: f64,
    /// Pending tasks whose due date is before today.
    pub overdue: i64,
    pub by_priority: PriorityCounts,
    pub by_category: Vec<CategoryCount>,
}

/// Single-row totals query result.
#[derive(Debug, FromRow)]
pub(crate) struct TaskTotals {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}
