//! Repository for the `tasks` table.
//!
//! Every read resolves the task's category inline through a
//! `LEFT JOIN categories`. Writes use a data-modifying CTE named `t` so the
//! joined row comes back in the same round-trip.

use sqlx::PgPool;
use taskflow_core::stats::completion_rate;
use taskflow_core::task::{CategoryFilter, NewTask, TaskChanges, TaskFilter, TaskStatus};
use taskflow_core::types::{Date, DbId};

use crate::models::stats::{CategoryCount, PriorityCounts, TaskStats, TaskTotals};
use crate::models::task::{TaskRow, TaskWithCategory};

/// Select list for `t` (tasks) joined with `c` (categories).
const JOINED_COLUMNS: &str = "t.id, t.owner_id, t.title, t.description, t.category_id, \
     t.due_date, t.priority, t.status, t.created_at, t.updated_at, \
     c.owner_id AS category_owner_id, c.name AS category_name, c.color AS category_color, \
     c.created_at AS category_created_at, c.updated_at AS category_updated_at";

/// Provides CRUD, status, filtered listing and statistics for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// List a user's tasks, newest first, narrowed by `filter`.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskWithCategory>, sqlx::Error> {
        let (uncategorized, category_id) = match filter.category {
            Some(CategoryFilter::Uncategorized) => (true, None),
            Some(CategoryFilter::Id(id)) => (false, Some(id)),
            None => (false, None),
        };

        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM tasks t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.owner_id = $1
               AND ($2::text IS NULL OR t.status = $2)
               AND ($3::text IS NULL OR t.priority = $3)
               AND (NOT $4::bool OR t.category_id IS NULL)
               AND ($5::bigint IS NULL OR t.category_id = $5)
             ORDER BY t.created_at DESC, t.id DESC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(owner_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(uncategorized)
            .bind(category_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(TaskWithCategory::from).collect())
    }

    /// Find a task by its ID, regardless of owner.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM tasks t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.id = $1"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TaskWithCategory::from))
    }

    /// Insert a new `pending` task for `owner_id`.
    ///
    /// The composite foreign key `(category_id, owner_id)` rejects a category
    /// that does not belong to the same owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewTask,
    ) -> Result<TaskWithCategory, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                INSERT INTO tasks
                    (owner_id, title, description, category_id, due_date, priority, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM t
             LEFT JOIN categories c ON c.id = t.category_id"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.due_date)
            .bind(input.priority.as_str())
            .bind(TaskStatus::Pending.as_str())
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Apply a partial update. Only supplied fields are written, and
    /// `updated_at` moves only when a stored value actually changes.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TaskChanges,
    ) -> Result<Option<TaskWithCategory>, sqlx::Error> {
        const NEW_TITLE: &str = "COALESCE($2, title)";
        const NEW_DESCRIPTION: &str = "CASE WHEN $3 THEN $4 ELSE description END";
        const NEW_CATEGORY: &str = "CASE WHEN $5 THEN $6 ELSE category_id END";
        const NEW_DUE_DATE: &str = "CASE WHEN $7 THEN $8 ELSE due_date END";
        const NEW_PRIORITY: &str = "COALESCE($9, priority)";
        const NEW_STATUS: &str = "COALESCE($10, status)";

        let query = format!(
            "WITH t AS (
                UPDATE tasks SET
                    title = {NEW_TITLE},
                    description = {NEW_DESCRIPTION},
                    category_id = {NEW_CATEGORY},
                    due_date = {NEW_DUE_DATE},
                    priority = {NEW_PRIORITY},
                    status = {NEW_STATUS},
                    updated_at = CASE
                        WHEN (title, description, category_id, due_date, priority, status)
                             IS DISTINCT FROM
                             ({NEW_TITLE}, {NEW_DESCRIPTION}, {NEW_CATEGORY},
                              {NEW_DUE_DATE}, {NEW_PRIORITY}, {NEW_STATUS})
                        THEN NOW()
                        ELSE updated_at
                    END
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM t
             LEFT JOIN categories c ON c.id = t.category_id"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .bind(changes.category_id.is_some())
            .bind(changes.category_id.flatten())
            .bind(changes.due_date.is_some())
            .bind(changes.due_date.flatten())
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TaskWithCategory::from))
    }

    /// Set a task's status. Setting the current status again is a no-op that
    /// leaves `updated_at` untouched.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: TaskStatus,
    ) -> Result<Option<TaskWithCategory>, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                UPDATE tasks SET
                    status = $2,
                    updated_at = CASE WHEN status = $2 THEN updated_at ELSE NOW() END
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM t
             LEFT JOIN categories c ON c.id = t.category_id"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TaskWithCategory::from))
    }

    /// Delete a task by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate report over a user's tasks. `today` decides what is overdue.
    ///
    /// Both queries read one `REPEATABLE READ` snapshot, so `total` always
    /// equals the sum of the `by_category` counts.
    pub async fn stats(pool: &PgPool, owner_id: DbId, today: Date) -> Result<TaskStats, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let totals = sqlx::query_as::<_, TaskTotals>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'pending' AND due_date < $2) AS overdue,
                COUNT(*) FILTER (WHERE priority = 'low') AS low,
                COUNT(*) FILTER (WHERE priority = 'medium') AS medium,
                COUNT(*) FILTER (WHERE priority = 'high') AS high
             FROM tasks
             WHERE owner_id = $1",
        )
        .bind(owner_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            "SELECT t.category_id, c.name, c.color, COUNT(*) AS count
             FROM tasks t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.owner_id = $1
             GROUP BY t.category_id, c.name, c.color
             ORDER BY count DESC, t.category_id ASC NULLS LAST",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TaskStats {
            total: totals.total,
            completed: totals.completed,
            pending: totals.pending,
            completion_rate: completion_rate(totals.completed, totals.total),
            overdue: totals.overdue,
            by_priority: PriorityCounts {
                low: totals.low,
                medium: totals.medium,
                high: totals.high,
            },
            by_category,
        })
    }
}
