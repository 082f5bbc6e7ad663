pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                    signup (public)
/// /auth/login                     login (public)
///
/// /categories                     list visible, create private
/// /categories/{id}                update own private category
///
/// /notes                          list own, create
/// /notes/{id}                     get own, patch own
///
/// /admin/categories               list all (admin only)
/// /admin/categories/{id}          delete non-default
/// /admin/categories/sync          sync default categories (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/notes", notes::router())
        .nest("/admin", admin::router())
}
