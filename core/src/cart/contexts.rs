// core/src/cart/contexts.rs

//! Context data threaded through the cart pipelines.

use crate::model::{CartAddition, CartLine, Order, OrderId, OrderLineItem, OrderReference, UserId};
use crate::sequence::SequenceGenerator;
use crate::store::SharedStore;

/// Collaborators every cart handler needs.
#[derive(Clone)]
pub struct CartDeps {
  pub store: SharedStore,
  pub sequence: SequenceGenerator,
}

pub struct AddToCartCtxData {
  pub deps: CartDeps,
  pub addition: CartAddition,
  /// Set by whichever step wrote the line.
  pub cart_line: Option<CartLine>,
}

impl AddToCartCtxData {
  pub fn new(deps: CartDeps, addition: CartAddition) -> Self {
    Self {
      deps,
      addition,
      cart_line: None,
    }
  }
}

pub struct CheckoutCtxData {
  pub deps: CartDeps,
  pub user_id: UserId,
  /// The cart as read at the start of checkout; the commit step requires the
  /// stored cart to still match it.
  pub cart_lines: Vec<CartLine>,
  pub line_items: Vec<OrderLineItem>,
  pub total_amount: f64,
  pub order_reference: Option<OrderReference>,
  pub order_id: Option<OrderId>,
  pub order: Option<Order>,
}

impl CheckoutCtxData {
  pub fn new(deps: CartDeps, user_id: UserId) -> Self {
    Self {
      deps,
      user_id,
      cart_lines: Vec::new(),
      line_items: Vec::new(),
      total_amount: 0.0,
      order_reference: None,
      order_id: None,
      order: None,
    }
  }
}
