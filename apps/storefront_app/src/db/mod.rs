// apps/storefront_app/src/db/mod.rs

mod postgres;

pub use postgres::PgStore;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects to `DATABASE_URL`. Returns `None` when no database is configured.
pub async fn create_pool(config: &AppConfig) -> Result<Option<PgPool>> {
  let Some(url) = config.database_url.as_deref() else {
    return Ok(None);
  };

  let pool = PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .acquire_timeout(ACQUIRE_TIMEOUT)
    .connect(url)
    .await?;
  info!(max_connections = config.db_max_connections, "Connected to PostgreSQL.");

  if config.run_migrations {
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied.");
  }
  Ok(Some(pool))
}

/// Cheap liveness probe used by the health endpoint.
pub async fn ping(pool: &PgPool) -> Result<()> {
  sqlx::query("SELECT 1").execute(pool).await.map_err(AppError::from)?;
  Ok(())
}
