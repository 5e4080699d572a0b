use sqlx::postgres::{PgPool, PgPoolOptions};
use crate::config::DatabaseConfig;
use anyhow::Result;
use tracing::info;

pub use operations::*;
pub use pool::*;

pub mod pool;
pub mod operations;

/// Connect and migrate, or `None` when no database URL is configured.
pub async fn create_pool(config: &DatabaseConfig) -> Result<Option<PgPool>> {
    let Some(url) = config.url.as_deref() else {
        info!("DATABASE_URL not set, persistence routes disabled");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(url)
        .await?;

    // Test connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    Ok(Some(pool))
}
