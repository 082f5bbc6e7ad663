//! [`CacheStore`] backed by the `cache_entries` table.
//!
//! Unlike the in-memory store this one is shared by every process that talks
//! to the same database, so a version bump from an out-of-band job is seen by
//! the API servers immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jotter_core::cache::{CacheError, CacheStore, SWEEP_INTERVAL};
use sqlx::PgPool;

/// Database-backed cache store.
///
/// Expired rows are filtered on read and deleted by every
/// [`SWEEP_INTERVAL`]th `set` made through this handle.
#[derive(Clone)]
pub struct PgCacheStore {
    pool: PgPool,
    writes: Arc<AtomicU64>,
}

impl PgCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }
}

fn backend_error(err: sqlx::Error) -> CacheError {
    CacheError::Backend(err.to_string())
}

fn expiry(ttl: Duration) -> Result<chrono::DateTime<Utc>, CacheError> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| CacheError::Backend(format!("Invalid cache TTL: {e}")))?;
    Ok(Utc::now() + ttl)
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM cache_entries WHERE key = $1 AND expires_at > NOW()",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        sqlx::query(
            "INSERT INTO cache_entries (key, value, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                expires_at = EXCLUDED.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expiry(ttl)?)
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            self.purge_expired().await?;
        }
        Ok(())
    }

    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        // An expired row counts as absent and is replaced.
        let row: Option<(String,)> = sqlx::query_as(
            "INSERT INTO cache_entries (key, value, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                expires_at = EXCLUDED.expires_at
             WHERE cache_entries.expires_at <= NOW()
             RETURNING key",
        )
        .bind(key)
        .bind(value)
        .bind(expiry(ttl)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;
        Ok(row.is_some())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let current: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM cache_entries WHERE key = $1 AND expires_at > NOW()",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        match current {
            None => return Err(CacheError::Missing(key.to_string())),
            Some((value,)) if value.parse::<i64>().is_err() => {
                return Err(CacheError::NotAnInteger(key.to_string()));
            }
            Some(_) => {}
        }

        // The increment itself is a single row-locked UPDATE, so concurrent
        // callers each observe a distinct value.
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE cache_entries
             SET value = (value::BIGINT + 1)::TEXT
             WHERE key = $1 AND expires_at > NOW()
             RETURNING value::BIGINT",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.map(|(value,)| value)
            .ok_or_else(|| CacheError::Missing(key.to_string()))
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;
        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired cache_entries rows");
        }
        Ok(removed)
    }
}
