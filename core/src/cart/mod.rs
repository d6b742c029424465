// core/src/cart/mod.rs

//! Cart line mutation and the cart-to-order checkout.

pub mod add_pipeline;
pub mod checkout_pipeline;
pub mod contexts;

use std::sync::Arc;
use tracing::{info, instrument, warn};

use self::contexts::{AddToCartCtxData, CartDeps, CheckoutCtxData};
use crate::error::{LifecycleError, PipelineError, Result};
use crate::model::{CartAddition, CartLine, Order, ProductId, UserId};
use crate::pipeline::{ContextData, Pipeline, PipelineResult};
use crate::sequence::SequenceGenerator;
use crate::store::{CartStore, OrderStore, SharedStore};

#[derive(Clone)]
pub struct CartManager {
  deps: CartDeps,
  add_to_cart: Arc<Pipeline<AddToCartCtxData, LifecycleError>>,
  checkout: Arc<Pipeline<CheckoutCtxData, LifecycleError>>,
}

impl CartManager {
  pub fn new(store: SharedStore, sequence: SequenceGenerator) -> Self {
    Self {
      deps: CartDeps { store, sequence },
      add_to_cart: Arc::new(add_pipeline::build_add_to_cart_pipeline()),
      checkout: Arc::new(checkout_pipeline::build_checkout_pipeline()),
    }
  }

  /// Adds `addition.quantity` of a product to the user's cart, creating the
  /// line on first add. Returns the line as stored afterwards.
  #[instrument(
    name = "CartManager::add_to_cart",
    skip(self, addition),
    fields(user_id = addition.user_id, product_id = addition.product_id, quantity = addition.quantity),
    err(Display)
  )]
  pub async fn add_to_cart(&self, addition: CartAddition) -> Result<CartLine> {
    let ctx = ContextData::new(AddToCartCtxData::new(self.deps.clone(), addition));
    let outcome = self.add_to_cart.run(ctx.clone()).await?;
    ensure_completed(outcome, "add_to_cart")?;

    ctx.take(|data| &mut data.cart_line).ok_or_else(|| {
      PipelineError::MissingOutput {
        pipeline: "add_to_cart",
        missing: "a cart line",
      }
      .into()
    })
  }

  #[instrument(name = "CartManager::remove_from_cart", skip(self), err(Display))]
  pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
    if !self.deps.store.delete_cart_line(user_id, product_id).await? {
      warn!("No such cart line to remove.");
      return Err(LifecycleError::NotFound("Item not found in cart".to_string()));
    }
    info!("Cart line removed.");
    Ok(())
  }

  #[instrument(name = "CartManager::list_cart", skip(self), err(Display))]
  pub async fn list_cart(&self, user_id: UserId) -> Result<Vec<CartLine>> {
    Ok(self.deps.store.list_cart_lines(user_id).await?)
  }

  /// Turns the user's whole cart into an order and empties the cart, as one
  /// store transaction. Fails with `InvalidInput::EmptyCart` when there is
  /// nothing to order, and with `Conflict` when the cart changed while the
  /// order was being assembled.
  #[instrument(name = "CartManager::create_order", skip(self), err(Display))]
  pub async fn create_order(&self, user_id: UserId) -> Result<Order> {
    let ctx = ContextData::new(CheckoutCtxData::new(self.deps.clone(), user_id));
    let outcome = self.checkout.run(ctx.clone()).await?;
    ensure_completed(outcome, "checkout")?;

    ctx.take(|data| &mut data.order).ok_or_else(|| {
      PipelineError::MissingOutput {
        pipeline: "checkout",
        missing: "an order",
      }
      .into()
    })
  }

  /// Most recent first.
  #[instrument(name = "CartManager::list_orders", skip(self), err(Display))]
  pub async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
    Ok(self.deps.store.list_orders(user_id).await?)
  }
}

fn ensure_completed(outcome: PipelineResult, pipeline: &'static str) -> Result<()> {
  match outcome {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => Err(PipelineError::Halted { pipeline }.into()),
  }
}
