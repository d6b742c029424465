// apps/storefront_app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use super::UserQuery;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CreateOrderRequestPayload {
  pub user_id: i64,
}

#[instrument(name = "handler::create_order", skip(app_state))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateOrderRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.lifecycle.cart.create_order(req_payload.user_id).await?;
  info!(
    order_id = order.id,
    order_reference = %order.order_reference,
    total_amount = order.total_amount,
    "Order created."
  );
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.cart.list_orders(query.user_id).await?;
  Ok(HttpResponse::Ok().json(orders))
}
