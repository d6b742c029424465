// core/src/cart/checkout_pipeline.rs

use chrono::Utc;
use tracing::{info, warn};

use super::contexts::CheckoutCtxData;
use crate::error::{InvalidInput, LifecycleError, PipelineError, Result};
use crate::model::{Order, OrderLineItem, OrderReference};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::sequence::ORDERS;
use crate::store::{CartStore, OrderStore};

pub const LOAD_CART: &str = "load_cart";
pub const PRICE_ORDER: &str = "price_order";
pub const ISSUE_ORDER_ID: &str = "issue_order_id";
pub const COMMIT_ORDER: &str = "commit_order";

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, LifecycleError> {
  let mut p = Pipeline::<CheckoutCtxData, LifecycleError>::new(&[
    (LOAD_CART, None),
    (PRICE_ORDER, None),
    (ISSUE_ORDER_ID, None),
    (COMMIT_ORDER, None),
  ]);

  p.on_root(LOAD_CART, load_cart);
  p.on_root(PRICE_ORDER, price_order);
  p.on_root(ISSUE_ORDER_ID, issue_order_id);
  p.on_root(COMMIT_ORDER, commit_order);
  p.after_root(COMMIT_ORDER, log_committed_order);
  p
}

async fn load_cart(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (store, user_id) = {
    let guard = ctx.read();
    (guard.deps.store.clone(), guard.user_id)
  };

  let lines = store.list_cart_lines(user_id).await?;
  if lines.is_empty() {
    warn!(user_id, "Checkout attempted with an empty cart.");
    return Err(InvalidInput::EmptyCart.into());
  }

  info!(user_id, lines = lines.len(), "Loaded cart for checkout.");
  ctx.write().cart_lines = lines;
  Ok(PipelineControl::Continue)
}

async fn price_order(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let mut guard = ctx.write();
  let line_items: Vec<OrderLineItem> = guard.cart_lines.iter().map(OrderLineItem::from).collect();
  guard.total_amount = Order::total_of(&line_items);
  guard.line_items = line_items;
  guard.order_reference = Some(OrderReference::generate());
  Ok(PipelineControl::Continue)
}

async fn issue_order_id(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let sequence = ctx.read().deps.sequence.clone();
  let order_id = sequence.next_id(ORDERS).await?;
  ctx.write().order_id = Some(order_id);
  Ok(PipelineControl::Continue)
}

async fn commit_order(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (store, order, consumed) = {
    let mut guard = ctx.write();
    let (Some(id), Some(order_reference)) = (guard.order_id, guard.order_reference.clone()) else {
      return Err(LifecycleError::Pipeline(PipelineError::MissingOutput {
        pipeline: "checkout",
        missing: "an order id and reference",
      }));
    };
    let order = Order {
      id,
      user_id: guard.user_id,
      order_reference,
      total_amount: guard.total_amount,
      created_at: Utc::now(),
      line_items: std::mem::take(&mut guard.line_items),
    };
    (guard.deps.store.clone(), order, std::mem::take(&mut guard.cart_lines))
  };

  store.commit_order(&order, &consumed).await?;
  ctx.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn log_committed_order(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let guard = ctx.read();
  if let Some(order) = &guard.order {
    info!(
      order_id = order.id,
      order_reference = %order.order_reference,
      total_amount = order.total_amount,
      lines = order.line_items.len(),
      "Order committed and cart cleared."
    );
  }
  Ok(PipelineControl::Continue)
}
