//! Route definitions for `/admin`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /categories         -> list_all_categories
/// DELETE /categories/{id}    -> delete_category
/// POST   /categories/sync    -> sync_default_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(admin::list_all_categories))
        .route("/categories/sync", post(admin::sync_default_categories))
        .route("/categories/{id}", delete(admin::delete_category))
}
