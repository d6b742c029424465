// apps/storefront_app/src/state.rs
use crate::config::AppConfig;
use orderflow::OrderLifecycle;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: OrderLifecycle,
  /// Present only when running against PostgreSQL; used by health checks.
  pub db_pool: Option<PgPool>,
  pub config: Arc<AppConfig>,
}
