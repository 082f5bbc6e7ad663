//! Repository for the `categories` table.

use jotter_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list for categories queries.
const COLUMNS: &str = "id, name, color, is_default, owner_id, created_at, updated_at";

/// Rows a user may see: shared ones plus their own.
const VISIBLE_TO_USER: &str = "(owner_id IS NULL OR owner_id = $1)";

/// Upsert result carrying whether the row was freshly inserted.
#[derive(FromRow)]
struct UpsertedCategory {
    #[sqlx(flatten)]
    category: Category,
    inserted: bool,
}

/// Provides data access for shared and private categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Categories visible to a user, defaults first then by name.
    pub async fn list_visible(pool: &PgPool, user_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE {VISIBLE_TO_USER}
             ORDER BY is_default DESC, name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every category regardless of owner, for administration.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             ORDER BY is_default DESC, name ASC, id ASC"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by ID only if it is shared or owned by `user_id`.
    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE {VISIBLE_TO_USER} AND id = $2"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a category. `owner_id = None` creates a shared, non-default one.
    pub async fn create(
        pool: &PgPool,
        owner_id: Option<DbId>,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, color, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.color)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Update a category by ID, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a shared default category by name.
    ///
    /// Returns the row and `true` when it was inserted rather than updated.
    pub async fn upsert_shared_default(
        pool: &PgPool,
        name: &str,
        color: &str,
    ) -> Result<(Category, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, color, owner_id, is_default)
             VALUES ($1, $2, NULL, TRUE)
             ON CONFLICT (name) WHERE owner_id IS NULL DO UPDATE SET
                color = EXCLUDED.color,
                is_default = TRUE,
                updated_at = NOW()
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertedCategory>(&query)
            .bind(name)
            .bind(color)
            .fetch_one(pool)
            .await?;
        Ok((row.category, row.inserted))
    }

    /// Delete a category by ID. Returns `true` if a row was deleted.
    ///
    /// Fails with a foreign-key violation while notes still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
