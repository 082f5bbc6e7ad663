//! Versioned read-through cache for per-user category listings.
//!
//! Every payload key embeds the current value of one shared version counter
//! (`categories:user:<user_id>:v:<version>`). Bumping the counter orphans all
//! existing payloads at once. They are never enumerated here; the backend
//! reclaims them once their TTL has passed (see [`CacheStore::purge_expired`]).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::types::DbId;

use super::{CacheError, CacheStore};

/// Key holding the shared version counter.
pub const CATEGORY_CACHE_VERSION_KEY: &str = "categories_cache_version";

/// Expiry applied to both the counter and payloads (24 hours).
pub const DEFAULT_CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// The category listing cache. The only owner of the version counter.
#[derive(Clone)]
pub struct CategoryCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CategoryCache {
    /// Build a cache over `store` with the default TTL.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_ttl(store, DEFAULT_CATEGORY_CACHE_TTL)
    }

    pub fn with_ttl(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current version, lazily initialized to 1 when absent.
    pub async fn version(&self) -> Result<i64, CacheError> {
        match self.store.get(CATEGORY_CACHE_VERSION_KEY).await? {
            Some(raw) => raw
                .parse()
                .map_err(|_| CacheError::NotAnInteger(CATEGORY_CACHE_VERSION_KEY.to_string())),
            None => {
                self.store
                    .add(CATEGORY_CACHE_VERSION_KEY, "1", self.ttl)
                    .await?;
                Ok(1)
            }
        }
    }

    /// Payload key for a user at a given version.
    pub fn key_for(user_id: DbId, version: i64) -> String {
        format!("categories:user:{user_id}:v:{version}")
    }

    /// Payload key for a user at the current version.
    pub async fn payload_key(&self, user_id: DbId) -> Result<String, CacheError> {
        let version = self.version().await?;
        Ok(Self::key_for(user_id, version))
    }

    /// Return the cached payload for `user_id`, or run `compute` and store it.
    ///
    /// A hit is returned as-is without further validation.
    pub async fn get_or_compute<F, Fut, E>(&self, user_id: DbId, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: From<CacheError>,
    {
        let key = self.payload_key(user_id).await?;

        if let Some(payload) = self.store.get(&key).await? {
            tracing::debug!(user_id, %key, "Category cache hit");
            return Ok(payload);
        }

        tracing::debug!(user_id, %key, "Category cache miss");
        let payload = compute().await?;
        self.store.set(&key, &payload, self.ttl).await?;
        Ok(payload)
    }

    /// Invalidate every cached listing by advancing the version counter.
    ///
    /// Uses the backend's atomic increment when available. A missing counter
    /// is set straight to 2, since any reader since the last expiry will have
    /// lazily initialized it to 1. Without atomic increment this falls back to
    /// read-then-set, where concurrent bumps can collapse into one.
    pub async fn bump_version(&self) -> Result<(), CacheError> {
        match self.store.incr(CATEGORY_CACHE_VERSION_KEY).await {
            Ok(version) => {
                tracing::debug!(version, "Category cache version bumped");
                Ok(())
            }
            Err(CacheError::Missing(_)) => {
                tracing::debug!(version = 2, "Category cache version initialized on bump");
                self.store
                    .set(CATEGORY_CACHE_VERSION_KEY, "2", self.ttl)
                    .await
            }
            Err(CacheError::Unsupported) => {
                let next = self.version().await? + 1;
                tracing::warn!(
                    version = next,
                    "Cache backend lacks atomic increment, bumping category cache version non-atomically"
                );
                self.store
                    .set(CATEGORY_CACHE_VERSION_KEY, &next.to_string(), self.ttl)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Reclaim expired payloads orphaned by earlier bumps.
    pub async fn purge_expired(&self) -> Result<u64, CacheError> {
        let removed = self.store.purge_expired().await?;
        tracing::debug!(removed, "Purged expired category cache entries");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::cache::InMemoryCacheStore;

    /// Backend without atomic increment, wrapping the in-memory store.
    #[derive(Default)]
    struct NoIncrStore(InMemoryCacheStore);

    #[async_trait]
    impl CacheStore for NoIncrStore {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
            self.0.set(key, value, ttl).await
        }

        async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
            self.0.add(key, value, ttl).await
        }
    }

    fn memory_cache() -> (Arc<InMemoryCacheStore>, CategoryCache) {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = CategoryCache::new(store.clone());
        (store, cache)
    }

    async fn raw_version(store: &dyn CacheStore) -> Option<String> {
        store.get(CATEGORY_CACHE_VERSION_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn orphaned_payloads_are_reclaimed_after_expiry() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = CategoryCache::with_ttl(store.clone(), Duration::from_millis(5));

        for _ in 0..10 {
            for user_id in 0..5 {
                cache
                    .get_or_compute(user_id, || async { Ok::<_, CacheError>("[]".to_string()) })
                    .await
                    .unwrap();
            }
            cache.bump_version().await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.purge_expired().await.unwrap();
        assert!(store.is_empty(), "{} expired entries left behind", store.len());
    }

    #[tokio::test]
    async fn version_is_lazily_initialized_to_one() {
        let (store, cache) = memory_cache();
        assert_eq!(raw_version(store.as_ref()).await, None);

        assert_eq!(cache.version().await.unwrap(), 1);
        assert_eq!(raw_version(store.as_ref()).await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn payload_key_embeds_user_and_version() {
        let (_store, cache) = memory_cache();
        assert_eq!(cache.payload_key(7).await.unwrap(), "categories:user:7:v:1");

        cache.bump_version().await.unwrap();
        assert_eq!(cache.payload_key(7).await.unwrap(), "categories:user:7:v:2");
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let (_store, cache) = memory_cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let first = cache
            .get_or_compute(1, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, CacheError>(r#"{"data":[{"id":1}]}"#.to_string())
            })
            .await
            .unwrap();
        let second = cache
            .get_or_compute(1, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, CacheError>("recomputed".to_string())
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bump_forces_recompute_for_every_user() {
        let (_store, cache) = memory_cache();

        for user_id in [1, 2] {
            cache
                .get_or_compute(user_id, || async { Ok::<_, CacheError>("old".to_string()) })
                .await
                .unwrap();
        }

        cache.bump_version().await.unwrap();

        for user_id in [1, 2] {
            let payload = cache
                .get_or_compute(user_id, || async { Ok::<_, CacheError>("new".to_string()) })
                .await
                .unwrap();
            assert_eq!(payload, "new");
        }
    }

    #[tokio::test]
    async fn users_do_not_share_payloads() {
        let (_store, cache) = memory_cache();
        cache
            .get_or_compute(1, || async { Ok::<_, CacheError>("one".to_string()) })
            .await
            .unwrap();
        let other = cache
            .get_or_compute(2, || async { Ok::<_, CacheError>("two".to_string()) })
            .await
            .unwrap();
        assert_eq!(other, "two");
    }

    #[tokio::test]
    async fn compute_error_is_not_cached() {
        let (_store, cache) = memory_cache();
        let err = cache
            .get_or_compute(1, || async {
                Err::<String, _>(CacheError::Backend("store down".into()))
            })
            .await;
        assert!(err.is_err());

        let payload = cache
            .get_or_compute(1, || async { Ok::<_, CacheError>("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(payload, "ok");
    }

    #[tokio::test]
    async fn atomic_bump_increments_existing_counter() {
        let (store, cache) = memory_cache();
        cache.version().await.unwrap();
        cache.bump_version().await.unwrap();
        cache.bump_version().await.unwrap();
        assert_eq!(raw_version(store.as_ref()).await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn atomic_bump_on_absent_counter_sets_two() {
        let (store, cache) = memory_cache();
        cache.bump_version().await.unwrap();
        assert_eq!(raw_version(store.as_ref()).await.as_deref(), Some("2"));
        assert_eq!(cache.version().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn fallback_bump_on_absent_counter_sets_two() {
        let store = Arc::new(NoIncrStore::default());
        let cache = CategoryCache::new(store.clone());

        cache.bump_version().await.unwrap();
        assert_eq!(raw_version(store.as_ref()).await.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn fallback_bump_reads_then_sets_next_value() {
        let store = Arc::new(NoIncrStore::default());
        let cache = CategoryCache::new(store.clone());
        store
            .set(CATEGORY_CACHE_VERSION_KEY, "5", DEFAULT_CATEGORY_CACHE_TTL)
            .await
            .unwrap();

        cache.bump_version().await.unwrap();
        assert_eq!(cache.version().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn corrupt_counter_surfaces_an_error() {
        let (store, cache) = memory_cache();
        store
            .set(CATEGORY_CACHE_VERSION_KEY, "garbage", DEFAULT_CATEGORY_CACHE_TTL)
            .await
            .unwrap();
        assert!(cache.version().await.is_err());
    }
}
