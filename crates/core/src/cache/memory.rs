//! Process-local [`CacheStore`] backed by a sharded concurrent map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{CacheError, CacheStore, SWEEP_INTERVAL};

struct Slot {
    value: String,
    expires_at: Instant,
}

impl Slot {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory cache with lazy expiry.
///
/// Expired entries are dropped when next read, and every
/// [`SWEEP_INTERVAL`]th `set` sweeps the whole map. `incr` holds the shard
/// lock for the read-modify-write, so it is atomic within the process.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: DashMap<String, Slot>,
    writes: AtomicU64,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&self) -> u64 {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| slot.is_live(now));
        let removed = before.saturating_sub(self.entries.len()) as u64;
        if removed > 0 {
            tracing::debug!(removed, "Swept expired in-memory cache entries");
        }
        removed
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(slot) = self.entries.get(key) {
            if slot.is_live(now) {
                return Ok(Some(slot.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, slot| !slot.is_live(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), Slot::new(value, ttl));
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            self.sweep();
        }
        Ok(())
    }

    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Ok(false)
                } else {
                    occupied.insert(Slot::new(value, ttl));
                    Ok(true)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::new(value, ttl));
                Ok(true)
            }
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut slot) if slot.is_live(now) => {
                let current: i64 = slot
                    .value
                    .parse()
                    .map_err(|_| CacheError::NotAnInteger(key.to_string()))?;
                let next = current + 1;
                slot.value = next.to_string();
                Ok(next)
            }
            _ => Err(CacheError::Missing(key.to_string())),
        }
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        Ok(self.sweep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = InMemoryCacheStore::new();
        store.set("k", "v", TTL).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn missing_key_reads_none() {
        let store = InMemoryCacheStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn add_does_not_overwrite_live_value() {
        let store = InMemoryCacheStore::new();
        assert!(store.add("k", "first", TTL).await.unwrap());
        assert!(!store.add("k", "second", TTL).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn expired_entries_are_invisible() {
        let store = InMemoryCacheStore::new();
        store.set("k", "1", Duration::from_millis(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert_matches!(store.incr("k").await, Err(CacheError::Missing(_)));
        assert!(store.add("k", "fresh", TTL).await.unwrap());
    }

    #[tokio::test]
    async fn incr_increments_integer_values() {
        let store = InMemoryCacheStore::new();
        store.set("n", "41", TTL).await.unwrap();
        assert_eq!(store.incr("n").await.unwrap(), 42);
        assert_eq!(store.get("n").await.unwrap().as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn incr_on_absent_key_is_missing() {
        let store = InMemoryCacheStore::new();
        assert_matches!(store.incr("n").await, Err(CacheError::Missing(k)) if k == "n");
    }

    #[tokio::test]
    async fn purge_removes_only_expired_entries() {
        let store = InMemoryCacheStore::new();
        store.set("old", "1", Duration::from_millis(1)).await.unwrap();
        store.set("live", "2", TTL).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("live").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn writes_sweep_unread_expired_entries() {
        let store = InMemoryCacheStore::new();
        for i in 0..SWEEP_INTERVAL {
            store
                .set(&format!("orphan:{i}"), "x", Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;

        // The expired keys are never read again; only writes reclaim them.
        for i in 0..SWEEP_INTERVAL {
            store.set(&format!("live:{i}"), "y", TTL).await.unwrap();
        }
        assert_eq!(store.len(), SWEEP_INTERVAL as usize);
    }

    #[tokio::test]
    async fn incr_on_text_value_fails() {
        let store = InMemoryCacheStore::new();
        store.set("n", "abc", TTL).await.unwrap();
        assert_matches!(store.incr("n").await, Err(CacheError::NotAnInteger(_)));
    }
}
