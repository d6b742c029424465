// apps/storefront_app/tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use storefront_app::config::AppConfig;
use storefront_app::state::AppState;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// State over the in-memory store.
pub async fn memory_state(strict: bool) -> AppState {
  setup_tracing();
  let config = AppConfig {
    strict_status_transitions: strict,
    ..AppConfig::default()
  };
  storefront_app::build_state(config).await.expect("memory state builds")
}

/// State over PostgreSQL when `TEST_DATABASE_URL` is set.
pub async fn postgres_state() -> Option<AppState> {
  let url = std::env::var("TEST_DATABASE_URL").ok()?;
  setup_tracing();
  let config = AppConfig {
    database_url: Some(url),
    db_max_connections: 5,
    ..AppConfig::default()
  };
  Some(storefront_app::build_state(config).await.expect("postgres state builds"))
}
