//! Repository for the `notes` table.
//!
//! Every read returns notes joined with their category's display fields and
//! is scoped to the owning user.

use jotter_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{NewNote, Note, NoteRow, UpdateNote};

/// Select list over `n` (notes) joined with `c` (categories).
const JOINED_COLUMNS: &str = "n.id, n.title, n.content, n.created_at, n.edited_at, n.user_id, \
    c.id AS category_id, c.name AS category_name, c.color AS category_color";

/// Listing order: most recently edited first, then most recently created.
const ORDER: &str = "ORDER BY n.edited_at DESC, n.created_at DESC, n.id DESC";

/// Provides owner-scoped access to notes.
pub struct NoteRepo;

impl NoteRepo {
    /// All notes owned by `user_id`, newest edits first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM notes n
             JOIN categories c ON c.id = n.category_id
             WHERE n.user_id = $1
             {ORDER}"
        );
        let rows = sqlx::query_as::<_, NoteRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    /// A single note, only if owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM notes n
             JOIN categories c ON c.id = n.category_id
             WHERE n.user_id = $1 AND n.id = $2"
        );
        let row = sqlx::query_as::<_, NoteRow>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Note::from))
    }

    /// Insert a note for `user_id`, returning it with its category attached.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "WITH n AS (
                INSERT INTO notes (title, content, category_id, user_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM n
             JOIN categories c ON c.id = n.category_id"
        );
        let row = sqlx::query_as::<_, NoteRow>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(Note::from(row))
    }

    /// Apply the provided fields of `input` to a note owned by `user_id`.
    ///
    /// `edited_at` always advances, even when no field is provided. Returns
    /// `None` if the note does not exist or belongs to someone else.
    pub async fn update_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "WITH n AS (
                UPDATE notes SET
                    title = COALESCE($3, title),
                    content = COALESCE($4, content),
                    category_id = COALESCE($5, category_id),
                    edited_at = clock_timestamp()
                WHERE user_id = $1 AND id = $2
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM n
             JOIN categories c ON c.id = n.category_id"
        );
        let row = sqlx::query_as::<_, NoteRow>(&query)
            .bind(user_id)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Note::from))
    }

    /// Number of notes referencing a category.
    pub async fn count_by_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
