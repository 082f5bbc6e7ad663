use jotter_core::cache::CategoryCache;
use jotter_core::categories::DEFAULT_CATEGORIES;
use jotter_core::error::CoreError;
use jotter_core::types::DbId;
use jotter_core::validation::validate_fields;
use jotter_db::models::category::{Category, CreateCategory, UpdateCategory};
use jotter_db::repositories::{CategoryRepo, NoteRepo};
use jotter_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

/// Counts reported by [`sync_defaults`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
}

/// Shared categories plus those owned by `user_id`, defaults first then by name.
pub async fn list_visible(pool: &DbPool, user_id: DbId) -> AppResult<Vec<Category>> {
    Ok(CategoryRepo::list_visible(pool, user_id).await?)
}

/// The category `category_id`, if `user_id` may assign it to a note.
///
/// Nonexistent and foreign private categories both yield
/// [`CoreError::CategoryNotFound`].
pub async fn resolve_assignable(
    pool: &DbPool,
    category_id: DbId,
    user_id: DbId,
) -> AppResult<Category> {
    CategoryRepo::find_visible(pool, category_id, user_id)
        .await?
        .filter(|category| category.is_visible_to(user_id))
        .ok_or(AppError::Core(CoreError::CategoryNotFound))
}

/// The serialized `{"data": [...]}` listing for `user_id`, served from the
/// category cache when present.
pub async fn visible_payload(
    pool: &DbPool,
    cache: &CategoryCache,
    user_id: DbId,
) -> AppResult<String> {
    cache
        .get_or_compute(user_id, || async move {
            let categories = list_visible(pool, user_id).await?;
            serde_json::to_string(&DataResponse { data: categories })
                .map_err(|e| AppError::InternalError(format!("Failed to serialize categories: {e}")))
        })
        .await
}

/// Create a category private to `user_id`.
pub async fn create_private(
    pool: &DbPool,
    cache: &CategoryCache,
    user_id: DbId,
    input: CreateCategory,
) -> AppResult<Category> {
    let input = input.normalized();
    validate_fields(&input)?;

    let category = CategoryRepo::create(pool, Some(user_id), &input).await?;
    cache.bump_version().await?;

    tracing::info!(category_id = category.id, user_id, "Private category created");
    Ok(category)
}

/// Update a category owned by `user_id`.
///
/// Shared categories are not editable here and are reported exactly like
/// foreign ones.
pub async fn update_private(
    pool: &DbPool,
    cache: &CategoryCache,
    user_id: DbId,
    category_id: DbId,
    input: UpdateCategory,
) -> AppResult<Category> {
    let input = input.normalized();
    validate_fields(&input)?;

    let existing = resolve_assignable(pool, category_id, user_id).await?;
    if existing.is_shared() {
        return Err(CoreError::CategoryNotFound.into());
    }

    let category = CategoryRepo::update(pool, category_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::CategoryNotFound))?;
    cache.bump_version().await?;

    tracing::info!(category_id, user_id, "Private category updated");
    Ok(category)
}

/// Delete a non-default category that no note references.
pub async fn delete_as_admin(
    pool: &DbPool,
    cache: &CategoryCache,
    category_id: DbId,
) -> AppResult<()> {
    let category = CategoryRepo::find_by_id(pool, category_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        })?;

    if category.is_default {
        return Err(CoreError::Forbidden("Default categories cannot be deleted".into()).into());
    }

    let note_count = NoteRepo::count_by_category(pool, category_id).await?;
    if note_count > 0 {
        return Err(CoreError::IntegrityViolation(format!(
            "Category is still assigned to {note_count} note(s)"
        ))
        .into());
    }

    // The RESTRICT foreign key still rejects a note inserted since the count.
    if !CategoryRepo::delete(pool, category_id).await? {
        return Err(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }
        .into());
    }
    cache.bump_version().await?;

    tracing::info!(category_id, name = %category.name, "Category deleted");
    Ok(())
}

/// Create or update every default category by name among shared categories.
pub async fn sync_defaults(pool: &DbPool, cache: &CategoryCache) -> AppResult<SyncReport> {
    let mut report = SyncReport::default();

    for default in DEFAULT_CATEGORIES {
        let (category, inserted) =
            CategoryRepo::upsert_shared_default(pool, default.name, default.color).await?;
        cache.bump_version().await?;

        if inserted {
            report.created += 1;
        } else {
            report.updated += 1;
        }
        tracing::debug!(category_id = category.id, name = %category.name, inserted, "Default category synced");
    }

    tracing::info!(
        created = report.created,
        updated = report.updated,
        "Default categories synchronized"
    );
    Ok(report)
}
