use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::CacheBackend;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, otherwise `"degraded"`.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether the category cache could read its version counter.
    pub cache_healthy: bool,
    pub cache_backend: &'static str,
}

/// GET /health -- reports database and category cache reachability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = jotter_db::health_check(&state.pool).await.is_ok();
    let cache_healthy = match state.category_cache.version().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Category cache unreachable");
            false
        }
    };

    let status = if db_healthy && cache_healthy { "ok" } else { "degraded" };
    let cache_backend = match state.config.cache.backend {
        CacheBackend::Memory => "memory",
        CacheBackend::Postgres => "postgres",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_healthy,
        cache_backend,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
