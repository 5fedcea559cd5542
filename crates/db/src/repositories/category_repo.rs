//! Repository for the `categories` table.

use sqlx::{PgConnection, PgPool};
use taskflow_core::category::NewCategory;
use taskflow_core::types::DbId;

use crate::models::category::{Category, CategoryWithCount};

/// Column list for categories queries.
const COLUMNS: &str = "id, owner_id, name, color, created_at, updated_at";

/// Provides create, list and delete operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List a user's categories with their live task counts, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.owner_id, c.name, c.color, c.created_at, c.updated_at,
                    (SELECT COUNT(*) FROM tasks t WHERE t.category_id = c.id) AS task_count
             FROM categories c
             WHERE c.owner_id = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Find a category by its ID, regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new category for `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (owner_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Delete a category after detaching every task that references it.
    ///
    /// Runs in one transaction: the category row is locked, referencing
    /// tasks get `category_id = NULL`, then the category is removed. Returns
    /// the number of detached tasks, or `None` if the category did not exist.
    pub async fn delete_detaching_tasks(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let detached = detach_tasks(&mut *tx, id).await?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(category_id = id, detached, "Category deleted, tasks detached");
        Ok(Some(detached))
    }
}

/// Point every task of `category_id` at "no category".
async fn detach_tasks(conn: &mut PgConnection, category_id: DbId) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE tasks SET category_id = NULL, updated_at = NOW()
         WHERE category_id = $1",
    )
    .bind(category_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
