use std::sync::Arc;

use jotter_core::cache::{CacheStore, CategoryCache, InMemoryCacheStore};
use jotter_db::cache_store::PgCacheStore;
use jotter_db::DbPool;

use crate::config::{CacheBackend, CacheConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Versioned per-user category listing cache.
    pub category_cache: Arc<CategoryCache>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let category_cache = Arc::new(build_category_cache(&config.cache, &pool));
        Self {
            pool,
            config: Arc::new(config),
            category_cache,
        }
    }
}

/// Build the category cache over the configured backend.
pub fn build_category_cache(config: &CacheConfig, pool: &DbPool) -> CategoryCache {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Memory => Arc::new(InMemoryCacheStore::new()),
        CacheBackend::Postgres => Arc::new(PgCacheStore::new(pool.clone())),
    };
    tracing::debug!(backend = ?config.backend, ttl_secs = config.ttl.as_secs(), "Category cache configured");
    CategoryCache::with_ttl(store, config.ttl)
}
