// apps/storefront_app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use orderflow::CartAddition;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::UserQuery;
use crate::errors::AppError;
use crate::state::AppState;

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub user_id: i64,
  pub product_id: i64,
  #[serde(default)]
  pub product_name: Option<String>,
  #[serde(default, alias = "product_price")]
  pub unit_price: Option<f64>,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

impl From<AddToCartRequestPayload> for CartAddition {
  fn from(payload: AddToCartRequestPayload) -> Self {
    CartAddition {
      user_id: payload.user_id,
      product_id: payload.product_id,
      product_name: payload.product_name,
      unit_price: payload.unit_price,
      quantity: payload.quantity,
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct RemoveFromCartRequestPayload {
  pub user_id: i64,
  pub product_id: i64,
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload),
  fields(user_id = req_payload.user_id, product_id = req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let line = app_state.lifecycle.cart.add_to_cart(req_payload.into_inner().into()).await?;
  info!(line_id = line.id, new_quantity = line.quantity, "Item added to cart.");
  Ok(HttpResponse::Ok().json(line))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RemoveFromCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  app_state
    .lifecycle
    .cart
    .remove_from_cart(req_payload.user_id, req_payload.product_id)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart" })))
}

#[instrument(name = "handler::list_cart", skip(app_state))]
pub async fn list_cart_handler(
  app_state: web::Data<AppState>,
  query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
  let lines = app_state.lifecycle.cart.list_cart(query.user_id).await?;
  Ok(HttpResponse::Ok().json(lines))
}
