//! Task rows.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::ownership::Owned;
use taskflow_core::types::{Date, DbId, Timestamp};

use super::category::Category;

/// A row from the `tasks` table.
///
/// `priority` and `status` are constrained by `CHECK` constraints to the
/// values of `TaskPriority` and `TaskStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub due_date: Option<Date>,
    pub priority: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task with its category resolved inline (`null` when uncategorized).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskWithCategory {
    #[serde(flatten)]
    pub task: Task,
    pub category: Option<Category>,
}

impl Owned for TaskWithCategory {
    const ENTITY: &'static str = "Task";

    fn owner_id(&self) -> DbId {
        self.task.owner_id
    }
}

/// Flat result of `tasks LEFT JOIN categories`.
#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    #[sqlx(flatten)]
    pub task: Task,
    pub category_owner_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub category_created_at: Option<Timestamp>,
    pub category_updated_at: Option<Timestamp>,
}

impl From<TaskRow> for TaskWithCategory {
    fn from(row: TaskRow) -> Self {
        let category = match (
            row.task.category_id,
            row.category_owner_id,
            row.category_name,
            row.category_color,
            row.category_created_at,
            row.category_updated_at,
        ) {
            (Some(id), Some(owner_id), Some(name), Some(color), Some(created_at), Some(updated_at)) => {
                Some(Category {
                    id,
                    owner_id,
                    name,
                    color,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        TaskWithCategory {
            task: row.task,
            category,
        }
    }
}
