pub mod categories;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories                  list, create
/// /categories/{id}             delete (tasks are detached)
///
/// /tasks                       list (?status, priority, category_id), create
/// /tasks/stats                 aggregate report
/// /tasks/{id}                  get, update (PUT/PATCH), delete
/// /tasks/{id}/status           set status
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/tasks", tasks::router())
}
