// apps/storefront_app/src/lib.rs

//! HTTP surface for the order lifecycle core: cart, checkout and delivery
//! tracking endpoints served by actix-web.

pub mod config;
pub mod db;
pub mod errors;
pub mod state;
pub mod web;

use orderflow::{LifecycleConfig, MemoryStore, OrderLifecycle, SharedStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::db::PgStore;
use crate::errors::Result;
use crate::state::AppState;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

/// Connects the configured store and wires the lifecycle services to it.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
  let db_pool = db::create_pool(&config).await?;
  let store: SharedStore = match &db_pool {
    Some(pool) => Arc::new(PgStore::new(pool.clone())),
    None => {
      info!("DATABASE_URL not set; using the in-memory store.");
      Arc::new(MemoryStore::new())
    }
  };

  let lifecycle = OrderLifecycle::new(
    store,
    LifecycleConfig {
      strict_status_transitions: config.strict_status_transitions,
    },
  );

  Ok(AppState {
    lifecycle,
    db_pool,
    config: Arc::new(config),
  })
}
