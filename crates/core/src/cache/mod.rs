//! Key/value cache abstraction and the versioned category cache.
//!
//! - [`CacheStore`] -- backend trait (get / set / add / atomic incr / purge).
//! - [`memory::InMemoryCacheStore`] -- process-local backend.
//! - [`category::CategoryCache`] -- per-user category listings namespaced
//!   by a shared version counter.
//!
//! Cache contents are always derived data; losing them costs a recompute,
//! never information.

pub mod category;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;

pub use category::CategoryCache;
pub use memory::InMemoryCacheStore;

/// Errors raised by cache backends.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// `incr` was called on a key that does not exist (or has expired).
    #[error("Cache key not found: {0}")]
    Missing(String),

    /// The backend has no atomic increment.
    #[error("Atomic increment is not supported by this cache backend")]
    Unsupported,

    /// `incr` was called on a value that does not parse as an integer.
    #[error("Cache value for key {0} is not an integer")]
    NotAnInteger(String),

    /// Any other backend failure (connection, query, ...).
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// A string-valued cache with per-entry expiry.
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value unconditionally.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Store a value only if no live value exists. Returns whether it was stored.
    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// Atomically increment an integer value and return the new value.
    ///
    /// Fails with [`CacheError::Missing`] when the key is absent. Backends
    /// without an atomic increment keep this default.
    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let _ = key;
        Err(CacheError::Unsupported)
    }

    /// Drop every expired entry and return how many were removed.
    ///
    /// Backends that expire entries on their own keep this default.
    async fn purge_expired(&self) -> Result<u64, CacheError> {
        Ok(0)
    }
}

/// Number of `set` calls between opportunistic sweeps of expired entries.
///
/// Orphaned payload keys are never read again after a version bump, so
/// expiry on read alone would never reclaim them.
pub const SWEEP_INTERVAL: u64 = 64;
