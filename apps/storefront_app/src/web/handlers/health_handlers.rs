// apps/storefront_app/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::db;
use crate::state::AppState;

const SERVICE_NAME: &str = "storefront_app";

pub async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "service": SERVICE_NAME, "status": "running" }))
}

pub async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  if let Some(pool) = &app_state.db_pool {
    if let Err(e) = db::ping(pool).await {
      warn!(error = %e, "Health check failed to reach the database.");
      return HttpResponse::ServiceUnavailable().json(json!({
        "status": "unhealthy",
        "service": SERVICE_NAME,
        "database": "unreachable"
      }));
    }
  }
  HttpResponse::Ok().json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}
