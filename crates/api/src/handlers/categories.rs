//! Handlers for `/categories`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use taskflow_core::category::{CreateCategory, NewCategory};
use taskflow_core::error::CoreError;
use taskflow_core::ownership::require_owned;
use taskflow_core::types::DbId;
use taskflow_db::models::category::{Category, CategoryWithCount};
use taskflow_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /categories
///
/// The caller's categories with live task counts, newest first.
pub async fn list_categories(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(categories))
}

/// POST /categories
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let input = NewCategory::try_from(input)?;
    let category = CategoryRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        category_id = category.id,
        "Category created",
    );

    Ok((
        StatusCode::CREATED,
        Json(CategoryWithCount {
            category,
            task_count: 0,
        }),
    ))
}

/// DELETE /categories/{id}
///
/// Tasks in the category are kept and become uncategorized.
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = CategoryRepo::find_by_id(&state.pool, id).await?;
    require_owned::<Category>(auth.user_id, id, existing)?;

    let detached = CategoryRepo::delete_detaching_tasks(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id,
        })?;

    tracing::info!(
        user_id = auth.user_id,
        category_id = id,
        detached,
        "Category deleted",
    );

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
