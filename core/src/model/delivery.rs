// core/src/model/delivery.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::OrderId;
use crate::error::InvalidInput;

/// Fulfillment stages, in delivery order. Declaration order is the
/// progression order, so `Ord` compares how far along an order is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStage {
  Placed,
  Packed,
  OutForDelivery,
  Delivered,
}

impl DeliveryStage {
  pub const ALL: [DeliveryStage; 4] = [
    DeliveryStage::Placed,
    DeliveryStage::Packed,
    DeliveryStage::OutForDelivery,
    DeliveryStage::Delivered,
  ];

  pub const INITIAL: DeliveryStage = DeliveryStage::Placed;

  pub fn as_str(self) -> &'static str {
    match self {
      DeliveryStage::Placed => "PLACED",
      DeliveryStage::Packed => "PACKED",
      DeliveryStage::OutForDelivery => "OUT_FOR_DELIVERY",
      DeliveryStage::Delivered => "DELIVERED",
    }
  }

  /// The stage after this one; `None` once delivered.
  pub fn next(self) -> Option<DeliveryStage> {
    match self {
      DeliveryStage::Placed => Some(DeliveryStage::Packed),
      DeliveryStage::Packed => Some(DeliveryStage::OutForDelivery),
      DeliveryStage::OutForDelivery => Some(DeliveryStage::Delivered),
      DeliveryStage::Delivered => None,
    }
  }

  pub fn is_terminal(self) -> bool {
    self.next().is_none()
  }
}

impl FromStr for DeliveryStage {
  type Err = InvalidInput;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DeliveryStage::ALL
      .into_iter()
      .find(|stage| stage.as_str() == s)
      .ok_or_else(|| InvalidInput::UnknownStatus { given: s.to_string() })
  }
}

impl fmt::Display for DeliveryStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Delivery progress of one order. Created lazily, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStatus {
  pub id: i64,
  pub order_id: OrderId,
  pub status: DeliveryStage,
  pub updated_at: DateTime<Utc>,
}
