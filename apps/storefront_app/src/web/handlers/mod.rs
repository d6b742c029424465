// apps/storefront_app/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod delivery_handlers;
pub mod health_handlers;
pub mod order_handlers;

use serde::Deserialize;

/// `?user_id=` on the listing endpoints.
#[derive(Deserialize, Debug)]
pub struct UserQuery {
  pub user_id: i64,
}
