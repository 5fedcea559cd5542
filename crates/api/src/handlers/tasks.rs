//! Handlers for `/tasks`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use taskflow_core::error::CoreError;
use taskflow_core::ownership::{authorize, require_owned};
use taskflow_core::task::{
    CreateTask, NewTask, SetTaskStatus, TaskChanges, TaskFilter, TaskListParams, TaskStatus,
    UpdateTask,
};
use taskflow_core::types::DbId;
use taskflow_db::models::task::TaskWithCategory;
use taskflow_db::repositories::{CategoryRepo, TaskRepo};
use taskflow_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a task and run the ownership guard on it.
async fn load_owned_task(
    pool: &DbPool,
    user_id: DbId,
    id: DbId,
) -> AppResult<TaskWithCategory> {
    let task = TaskRepo::find_by_id(pool, id).await?;
    Ok(require_owned(user_id, id, task)?)
}

/// A task may only point at one of the caller's own categories. Unknown and
/// foreign categories are reported the same way.
async fn ensure_category_usable(pool: &DbPool, user_id: DbId, category_id: DbId) -> AppResult<()> {
    let category = CategoryRepo::find_by_id(pool, category_id).await?;
    match category {
        Some(category) if authorize(user_id, &category).is_ok() => Ok(()),
        _ => Err(CoreError::validation("category_id", "Category not found").into()),
    }
}

fn task_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Task", id }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /tasks?status=&priority=&category_id=
///
/// The caller's tasks, newest first. `category_id=none` selects uncategorized
/// tasks; `all` or an empty value disables a filter.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = TaskFilter::try_from(params)?;
    let tasks = TaskRepo::list_for_owner(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(tasks))
}

/// GET /tasks/stats
pub async fn task_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let stats = TaskRepo::stats(&state.pool, auth.user_id, today).await?;
    Ok(Json(stats))
}

/// POST /tasks
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<impl IntoResponse> {
    let input = NewTask::try_from(input)?;
    if let Some(category_id) = input.category_id {
        ensure_category_usable(&state.pool, auth.user_id, category_id).await?;
    }

    let task = TaskRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, task_id = task.task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/{id}
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = load_owned_task(&state.pool, auth.user_id, id).await?;
    Ok(Json(task))
}

/// PUT|PATCH /tasks/{id}
///
/// Partial update: absent keys are left alone, `null` clears nullable fields.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    let current = load_owned_task(&state.pool, auth.user_id, id).await?;

    let changes = TaskChanges::try_from(input)?;
    if changes.is_empty() {
        return Ok(Json(current));
    }
    if let Some(category_id) = changes.target_category() {
        ensure_category_usable(&state.pool, auth.user_id, category_id).await?;
    }

    let task = TaskRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    tracing::info!(user_id = auth.user_id, task_id = id, "Task updated");

    Ok(Json(task))
}

/// PUT /tasks/{id}/status
pub async fn set_task_status(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SetTaskStatus>,
) -> AppResult<impl IntoResponse> {
    load_owned_task(&state.pool, auth.user_id, id).await?;
    let status = TaskStatus::try_from(input)?;

    let task = TaskRepo::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    tracing::info!(user_id = auth.user_id, task_id = id, status = %status, "Task status set");

    Ok(Json(task))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_task(&state.pool, auth.user_id, id).await?;

    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(task_not_found(id).into());
    }

    tracing::info!(user_id = auth.user_id, task_id = id, "Task deleted");

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
