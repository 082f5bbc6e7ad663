//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jotter_core::types::DbId;
use jotter_db::models::category::{CreateCategory, UpdateCategory};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::categories;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Categories visible to the caller, served as the cached JSON payload.
pub async fn list_categories(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let payload =
        categories::visible_payload(&state.pool, &state.category_cache, auth.user_id).await?;
    Ok(([(CONTENT_TYPE, "application/json")], payload))
}

/// POST /api/v1/categories
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category =
        categories::create_private(&state.pool, &state.category_cache, auth.user_id, input)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PATCH /api/v1/categories/{id}
pub async fn update_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = categories::update_private(
        &state.pool,
        &state.category_cache,
        auth.user_id,
        id,
        input,
    )
    .await?;
    Ok(Json(DataResponse { data: category }))
}
