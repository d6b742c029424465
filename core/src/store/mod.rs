// core/src/store/mod.rs

//! Storage ports. The lifecycle services only ever talk to these traits;
//! each method is a single atomic operation against the backing store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::model::{CartAddition, CartLine, DeliveryStage, DeliveryStatus, Order, OrderId, ProductId, UserId};

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait SequenceStore: Send + Sync {
  /// Atomically increments the counter named `entity` and returns the new
  /// value. A missing counter is created at 0 first, so the first call
  /// returns 1.
  async fn increment(&self, entity: &str) -> StoreResult<i64>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Folds `addition` into the existing line for its (user, product) pair.
  /// Returns `None` without writing anything when no such line exists.
  async fn merge_into_cart_line(&self, addition: &CartAddition) -> StoreResult<Option<CartLine>>;

  /// Inserts `line`. If a line for the same (user, product) pair appeared in
  /// the meantime, `line` is folded into it instead and `line.id` is unused.
  async fn insert_or_merge_cart_line(&self, line: &CartLine) -> StoreResult<CartLine>;

  /// Returns whether a line was removed.
  async fn delete_cart_line(&self, user_id: UserId, product_id: ProductId) -> StoreResult<bool>;

  async fn list_cart_lines(&self, user_id: UserId) -> StoreResult<Vec<CartLine>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Persists `order` and removes `consumed` from the user's cart in one
  /// transaction.
  ///
  /// The user's cart must still hold exactly `consumed` (same line ids and
  /// quantities); otherwise nothing is written and `StoreError::Conflict`
  /// is returned.
  async fn commit_order(&self, order: &Order, consumed: &[CartLine]) -> StoreResult<()>;

  /// Most recent first.
  async fn list_orders(&self, user_id: UserId) -> StoreResult<Vec<Order>>;
}

#[async_trait]
pub trait DeliveryStore: Send + Sync {
  async fn find_delivery_status(&self, order_id: OrderId) -> StoreResult<Option<DeliveryStatus>>;

  /// Inserts `status` unless the order already has one, and returns the
  /// record that is stored afterwards.
  async fn insert_delivery_status_if_absent(&self, status: &DeliveryStatus) -> StoreResult<DeliveryStatus>;

  /// Sets the order's stage and `updated_at`. With `expected`, the write only
  /// happens if the stored stage still equals it. Returns `None` when nothing
  /// was written.
  async fn set_delivery_stage(
    &self,
    order_id: OrderId,
    stage: DeliveryStage,
    expected: Option<DeliveryStage>,
    at: DateTime<Utc>,
  ) -> StoreResult<Option<DeliveryStatus>>;
}

/// Everything the lifecycle core needs from persistence.
pub trait Store: SequenceStore + CartStore + OrderStore + DeliveryStore {}

impl<T> Store for T where T: SequenceStore + CartStore + OrderStore + DeliveryStore {}

pub type SharedStore = Arc<dyn Store>;

/// True when `current` holds exactly the lines in `consumed`, compared by id
/// and quantity.
pub fn cart_matches_snapshot(current: &[CartLine], consumed: &[CartLine]) -> bool {
  let mut now: Vec<(i64, i32)> = current.iter().map(|l| (l.id, l.quantity)).collect();
  let mut then: Vec<(i64, i32)> = consumed.iter().map(|l| (l.id, l.quantity)).collect();
  now.sort_unstable();
  then.sort_unstable();
  now == then
}
