// core/src/model/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{CartLine, OrderId, ProductId, UserId};

/// Snapshot of one cart line at checkout time. Later catalog changes never
/// reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
  pub product_id: ProductId,
  pub product_name: Option<String>,
  pub quantity: i32,
  pub unit_price: f64,
}

impl From<&CartLine> for OrderLineItem {
  fn from(line: &CartLine) -> Self {
    Self {
      product_id: line.product_id,
      product_name: line.product_name.clone(),
      quantity: line.quantity,
      unit_price: line.unit_price.unwrap_or(0.0),
    }
  }
}

/// An immutable, completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  pub user_id: UserId,
  pub order_reference: OrderReference,
  pub total_amount: f64,
  pub created_at: DateTime<Utc>,
  pub line_items: Vec<OrderLineItem>,
}

impl Order {
  pub fn total_of(line_items: &[OrderLineItem]) -> f64 {
    line_items.iter().map(|item| item.unit_price * f64::from(item.quantity)).sum()
  }
}

/// Human-readable order token: `ORD-` followed by 8 uppercase hex digits.
///
/// Uniqueness is probabilistic (32 random bits); collisions are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
  const PREFIX: &'static str = "ORD-";
  const HEX_LEN: usize = 8;

  pub fn generate() -> Self {
    let hex = Uuid::new_v4().simple().to_string();
    OrderReference(format!("{}{}", Self::PREFIX, hex[..Self::HEX_LEN].to_ascii_uppercase()))
  }

  /// Accepts a stored reference, checking the format.
  pub fn parse(raw: &str) -> Option<Self> {
    let hex = raw.strip_prefix(Self::PREFIX)?;
    let well_formed = hex.len() == Self::HEX_LEN
      && hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
    well_formed.then(|| OrderReference(raw.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for OrderReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
