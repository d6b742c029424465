// apps/storefront_app/src/web/handlers/delivery_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequestPayload {
  #[serde(default)]
  pub status: Option<String>,
}

impl UpdateStatusRequestPayload {
  /// An empty body carries no target. Anything else must be a well-formed
  /// payload, whatever its content type.
  fn from_body(body: &[u8]) -> Result<Self, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
      return Ok(Self::default());
    }
    serde_json::from_slice(body).map_err(|e| {
      warn!(error = %e, "Rejected malformed update-status body.");
      AppError::from(e)
    })
  }
}

#[instrument(name = "handler::get_delivery_status", skip(app_state))]
pub async fn get_status_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let status = app_state.lifecycle.delivery.get_status(order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(status))
}

/// Without a target the order advances one stage.
#[instrument(name = "handler::update_delivery_status", skip(app_state, body))]
pub async fn update_status_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<i64>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let payload = UpdateStatusRequestPayload::from_body(&body)?;
  let status = app_state
    .lifecycle
    .delivery
    .advance_status(order_id.into_inner(), payload.status.as_deref())
    .await?;
  Ok(HttpResponse::Ok().json(status))
}
