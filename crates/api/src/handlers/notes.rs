//! Handlers for the `/notes` resource. Every note is scoped to the caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jotter_core::types::DbId;
use jotter_db::models::note::{CreateNote, UpdateNote};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::notes;
use crate::state::AppState;

/// GET /api/v1/notes
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notes = notes::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/notes
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNote>,
) -> AppResult<impl IntoResponse> {
    let note = notes::create(&state.pool, auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/notes/{id}
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let note = notes::get(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: note }))
}

/// PATCH /api/v1/notes/{id}
///
/// Omitted fields are left as stored.
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateNote>,
) -> AppResult<impl IntoResponse> {
    let note = notes::patch(&state.pool, auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: note }))
}
