//! Create or update the default categories, then invalidate cached listings.
//!
//! Intended to run at deploy time. With `CACHE_BACKEND=postgres` the version
//! bump reaches every running server; the in-memory backend only affects
//! this process.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jotter_api::config::CacheConfig;
use jotter_api::services::categories;
use jotter_api::state::build_category_cache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotter_api=info,sync_default_categories=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = jotter_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    jotter_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache_config = CacheConfig::from_env();
    if !cache_config.is_shared() {
        tracing::warn!(
            backend = ?cache_config.backend,
            "Cache backend is process-local; running servers keep their cached listings until they expire. Set CACHE_BACKEND=postgres to invalidate them"
        );
    }
    let cache = build_category_cache(&cache_config, &pool);
    cache
        .purge_expired()
        .await
        .context("Failed to purge expired cache entries")?;

    let report = categories::sync_defaults(&pool, &cache)
        .await
        .context("Failed to synchronize default categories")?;

    println!(
        "Default categories synchronized: {} created, {} updated",
        report.created, report.updated
    );
    Ok(())
}
