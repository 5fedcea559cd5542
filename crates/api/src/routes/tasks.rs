//! Route definitions for tasks.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Task routes.
///
/// ```text
/// GET    /              -> list_tasks (?status, priority, category_id)
/// POST   /              -> create_task
/// GET    /stats         -> task_stats
/// GET    /{id}          -> get_task
/// PUT    /{id}          -> update_task
/// PATCH  /{id}          -> update_task
/// DELETE /{id}          -> delete_task
/// PUT    /{id}/status   -> set_task_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/stats", get(tasks::task_stats))
        .route(
            "/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/{id}/status", put(tasks::set_task_status))
}
