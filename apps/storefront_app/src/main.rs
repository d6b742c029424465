// apps/storefront_app/src/main.rs

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use storefront_app::config::AppConfig;
use storefront_app::web::configure_app_routes;
use storefront_app::{build_state, init_tracing};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!(
    server_host = %app_config.server_host,
    server_port = app_config.server_port,
    database = app_config.database_url.is_some(),
    strict_status_transitions = app_config.strict_status_transitions,
    "Starting storefront application server..."
  );

  let server_address = app_config.bind_address();
  let app_state = build_state(app_config)
    .await
    .context("Failed to initialise application state")?;

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {server_address}"))?
  .run()
  .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
