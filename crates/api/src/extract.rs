//! Request extractors with the application's error shape.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections (malformed body, wrong content type) are
/// reported through [`AppError`] as a 400 `BAD_REQUEST` JSON body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
