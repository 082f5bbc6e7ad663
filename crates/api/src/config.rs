use std::str::FromStr;
use std::time::Duration;

use jotter_core::cache::category::DEFAULT_CATEGORY_CACHE_TTL;

use crate::auth::jwt::JwtConfig;

/// Which [`jotter_core::cache::CacheStore`] backs the category cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Process-local map. Invalidations are only seen by this process.
    Memory,
    /// The `cache_entries` table, shared by every process on the database.
    Postgres,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            other => Err(format!(
                "Unknown cache backend '{other}'. Must be one of: memory, postgres"
            )),
        }
    }
}

/// Category cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Expiry for the version counter and cached payloads.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Load cache configuration from environment variables.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `CACHE_BACKEND`           | `memory` |
    /// | `CATEGORY_CACHE_TTL_SECS` | `86400`  |
    pub fn from_env() -> Self {
        let backend: CacheBackend = std::env::var("CACHE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .parse()
            .unwrap_or_else(|e: String| panic!("{e}"));

        let ttl_secs: u64 = std::env::var("CATEGORY_CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_CATEGORY_CACHE_TTL.as_secs().to_string())
            .parse()
            .expect("CATEGORY_CACHE_TTL_SECS must be a valid u64");

        Self {
            backend,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Whether a version bump made by one process is seen by every other.
    pub fn is_shared(&self) -> bool {
        self.backend == CacheBackend::Postgres
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ttl: DEFAULT_CATEGORY_CACHE_TTL,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Run the default-category sync before serving (default: `true`).
    pub sync_default_categories: bool,
    pub cache: CacheConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SYNC_DEFAULT_CATEGORIES` | `true`                  |
    ///
    /// See [`CacheConfig::from_env`] and [`JwtConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let sync_default_categories: bool = std::env::var("SYNC_DEFAULT_CATEGORIES")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SYNC_DEFAULT_CATEGORIES must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            sync_default_categories,
            cache: CacheConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cache_backends_case_insensitively() {
        assert_eq!("memory".parse::<CacheBackend>(), Ok(CacheBackend::Memory));
        assert_eq!(" Postgres ".parse::<CacheBackend>(), Ok(CacheBackend::Postgres));
    }

    #[test]
    fn rejects_unknown_cache_backend() {
        let err = "redis".parse::<CacheBackend>().unwrap_err();
        assert!(err.contains("redis"));
    }

    #[test]
    fn default_cache_config_uses_one_day_ttl() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn only_postgres_backend_shares_invalidation() {
        assert!(!CacheConfig::default().is_shared());

        let config = CacheConfig {
            backend: CacheBackend::Postgres,
            ..CacheConfig::default()
        };
        assert!(config.is_shared());
    }
}
