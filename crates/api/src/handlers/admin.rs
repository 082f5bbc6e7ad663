//! Admin-only category management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jotter_core::types::DbId;
use jotter_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::categories;
use crate::state::AppState;

/// GET /api/v1/admin/categories
///
/// Every category, shared and private.
pub async fn list_all_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Refuses default categories and categories still assigned to notes.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    categories::delete_as_admin(&state.pool, &state.category_cache, id).await?;
    tracing::info!(category_id = id, admin_id = admin.user_id, "Admin deleted category");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/categories/sync
///
/// Create or update the default categories.
pub async fn sync_default_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = categories::sync_defaults(&state.pool, &state.category_cache).await?;
    Ok(Json(DataResponse { data: report }))
}
