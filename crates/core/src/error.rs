use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The category does not exist or is private to another user.
    ///
    /// Both causes collapse into this one variant so callers cannot learn about
    /// other users' private categories.
    #[error("Category not found")]
    CategoryNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid payload")]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A write would break a storage-level relation (e.g. deleting a
    /// category that notes still reference).
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
