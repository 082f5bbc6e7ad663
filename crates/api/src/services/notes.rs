use jotter_core::error::CoreError;
use jotter_core::types::DbId;
use jotter_core::validation::validate_fields;
use jotter_db::models::note::{CreateNote, NewNote, Note, UpdateNote};
use jotter_db::repositories::NoteRepo;
use jotter_db::DbPool;

use super::categories::resolve_assignable;
use crate::error::AppResult;

fn note_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Note", id }
}

/// Notes owned by `user_id`, most recently edited first.
pub async fn list(pool: &DbPool, user_id: DbId) -> AppResult<Vec<Note>> {
    Ok(NoteRepo::list_for_user(pool, user_id).await?)
}

/// A note owned by `user_id`. Other users' notes are reported as missing.
pub async fn get(pool: &DbPool, user_id: DbId, note_id: DbId) -> AppResult<Note> {
    NoteRepo::find_for_user(pool, user_id, note_id)
        .await?
        .ok_or_else(|| note_not_found(note_id).into())
}

/// Create a note for `user_id` in a category visible to them.
pub async fn create(pool: &DbPool, user_id: DbId, input: CreateNote) -> AppResult<Note> {
    let input = input.normalized();
    validate_fields(&input)?;

    let category_id = input
        .category_id
        .ok_or_else(|| CoreError::Validation("category_id is required".into()))?;
    let category = resolve_assignable(pool, category_id, user_id).await?;

    let note = NoteRepo::create(
        pool,
        user_id,
        &NewNote {
            title: input.title,
            content: input.content,
            category_id: category.id,
        },
    )
    .await?;

    tracing::info!(note_id = note.id, user_id, category_id, "Note created");
    Ok(note)
}

/// Apply the provided fields to a note owned by `user_id`.
///
/// `edited_at` advances even when no field is provided. A category that does
/// not resolve leaves the note untouched.
pub async fn patch(
    pool: &DbPool,
    user_id: DbId,
    note_id: DbId,
    input: UpdateNote,
) -> AppResult<Note> {
    let input = input.normalized();
    validate_fields(&input)?;

    get(pool, user_id, note_id).await?;

    if let Some(category_id) = input.category_id {
        resolve_assignable(pool, category_id, user_id).await?;
    }

    let note = NoteRepo::update_for_user(pool, user_id, note_id, &input)
        .await?
        .ok_or_else(|| note_not_found(note_id))?;

    tracing::info!(note_id, user_id, "Note updated");
    Ok(note)
}
