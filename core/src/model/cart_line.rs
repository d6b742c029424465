// core/src/model/cart_line.rs

use serde::{Deserialize, Serialize};

use super::{ProductId, UserId};
use crate::error::InvalidInput;

/// One product a user intends to purchase. At most one line exists per
/// (`user_id`, `product_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: i64,
  pub user_id: UserId,
  pub product_id: ProductId,
  /// Cached catalog name, refreshed when an add supplies one.
  pub product_name: Option<String>,
  /// Cached catalog price, refreshed when an add supplies one.
  pub unit_price: Option<f64>,
  pub quantity: i32,
}

impl CartLine {
  /// A fresh line for `addition`, carrying the id issued for it.
  pub fn from_addition(id: i64, addition: &CartAddition) -> Self {
    Self {
      id,
      user_id: addition.user_id,
      product_id: addition.product_id,
      product_name: addition.product_name.clone(),
      unit_price: addition.unit_price,
      quantity: addition.quantity,
    }
  }

  /// Folds a repeat add into this line: quantities add up, cached catalog
  /// fields are overwritten only when the add supplies them. The line is left
  /// untouched when the summed quantity does not fit.
  pub fn absorb(&mut self, addition: &CartAddition) -> Result<(), InvalidInput> {
    self.quantity = self
      .quantity
      .checked_add(addition.quantity)
      .ok_or(InvalidInput::QuantityOverflow {
        product_id: self.product_id,
      })?;
    if let Some(name) = &addition.product_name {
      self.product_name = Some(name.clone());
    }
    if let Some(price) = addition.unit_price {
      self.unit_price = Some(price);
    }
    Ok(())
  }

  /// Missing prices count as zero.
  pub fn line_total(&self) -> f64 {
    self.unit_price.unwrap_or(0.0) * f64::from(self.quantity)
  }
}

/// A request to put `quantity` more of a product into a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartAddition {
  pub user_id: UserId,
  pub product_id: ProductId,
  pub product_name: Option<String>,
  pub unit_price: Option<f64>,
  pub quantity: i32,
}

impl CartAddition {
  pub fn new(user_id: UserId, product_id: ProductId, quantity: i32) -> Self {
    Self {
      user_id,
      product_id,
      product_name: None,
      unit_price: None,
      quantity,
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.product_name = Some(name.into());
    self
  }

  pub fn with_price(mut self, price: f64) -> Self {
    self.unit_price = Some(price);
    self
  }
}

impl From<&CartLine> for CartAddition {
  fn from(line: &CartLine) -> Self {
    Self {
      user_id: line.user_id,
      product_id: line.product_id,
      product_name: line.product_name.clone(),
      unit_price: line.unit_price,
      quantity: line.quantity,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absorb_only_overwrites_supplied_fields() {
    let mut line = CartLine::from_addition(1, &CartAddition::new(42, 7, 2).with_name("Lamp").with_price(10.0));

    line.absorb(&CartAddition::new(42, 7, 3)).unwrap();
    assert_eq!(line.quantity, 5);
    assert_eq!(line.product_name.as_deref(), Some("Lamp"));
    assert_eq!(line.unit_price, Some(10.0));

    line.absorb(&CartAddition::new(42, 7, 1).with_price(12.5)).unwrap();
    assert_eq!(line.quantity, 6);
    assert_eq!(line.unit_price, Some(12.5));
  }

  #[test]
  fn absorb_rejects_quantity_overflow_without_changes() {
    let mut line = CartLine::from_addition(1, &CartAddition::new(42, 7, i32::MAX).with_price(1.0));

    let err = line.absorb(&CartAddition::new(42, 7, 1).with_price(2.0)).unwrap_err();
    assert_eq!(err, InvalidInput::QuantityOverflow { product_id: 7 });
    assert_eq!(line.quantity, i32::MAX);
    assert_eq!(line.unit_price, Some(1.0));
  }

  #[test]
  fn line_total_treats_missing_price_as_zero() {
    let line = CartLine::from_addition(1, &CartAddition::new(1, 2, 4));
    assert_eq!(line.line_total(), 0.0);
  }
}
