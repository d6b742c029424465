// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use orderflow::model::{OrderId, ProductId, UserId};
use orderflow::store::{CartStore, DeliveryStore, OrderStore, SequenceStore};
use orderflow::{
  CartAddition, CartLine, DeliveryStage, DeliveryStatus, LifecycleConfig, MemoryStore, Order, OrderLifecycle,
  StoreError, StoreResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn memory_lifecycle() -> (Arc<MemoryStore>, OrderLifecycle) {
  let store = Arc::new(MemoryStore::new());
  let lifecycle = OrderLifecycle::new(store.clone(), LifecycleConfig::default());
  (store, lifecycle)
}

pub fn priced(user_id: UserId, product_id: ProductId, price: f64, quantity: i32) -> CartAddition {
  CartAddition::new(user_id, product_id, quantity)
    .with_name(format!("product-{product_id}"))
    .with_price(price)
}

/// A `MemoryStore` whose individual operations can be switched to fail as if
/// the database had gone away.
#[derive(Default)]
pub struct FlakyStore {
  pub inner: MemoryStore,
  pub fail_increments: AtomicBool,
  pub fail_commits: AtomicBool,
}

impl FlakyStore {
  pub fn fail_increments(&self, fail: bool) {
    self.fail_increments.store(fail, Ordering::SeqCst);
  }

  pub fn fail_commits(&self, fail: bool) {
    self.fail_commits.store(fail, Ordering::SeqCst);
  }

  fn outage(what: &str) -> StoreError {
    StoreError::Unavailable(anyhow::anyhow!("simulated outage during {what}"))
  }
}

#[async_trait]
impl SequenceStore for FlakyStore {
  async fn increment(&self, entity: &str) -> StoreResult<i64> {
    if self.fail_increments.load(Ordering::SeqCst) {
      return Err(Self::outage("increment"));
    }
    self.inner.increment(entity).await
  }
}

#[async_trait]
impl CartStore for FlakyStore {
  async fn merge_into_cart_line(&self, addition: &CartAddition) -> StoreResult<Option<CartLine>> {
    self.inner.merge_into_cart_line(addition).await
  }

  async fn insert_or_merge_cart_line(&self, line: &CartLine) -> StoreResult<CartLine> {
    self.inner.insert_or_merge_cart_line(line).await
  }

  async fn delete_cart_line(&self, user_id: UserId, product_id: ProductId) -> StoreResult<bool> {
    self.inner.delete_cart_line(user_id, product_id).await
  }

  async fn list_cart_lines(&self, user_id: UserId) -> StoreResult<Vec<CartLine>> {
    self.inner.list_cart_lines(user_id).await
  }
}

#[async_trait]
impl OrderStore for FlakyStore {
  async fn commit_order(&self, order: &Order, consumed: &[CartLine]) -> StoreResult<()> {
    if self.fail_commits.load(Ordering::SeqCst) {
      return Err(Self::outage("commit_order"));
    }
    self.inner.commit_order(order, consumed).await
  }

  async fn list_orders(&self, user_id: UserId) -> StoreResult<Vec<Order>> {
    self.inner.list_orders(user_id).await
  }
}

#[async_trait]
impl DeliveryStore for FlakyStore {
  async fn find_delivery_status(&self, order_id: OrderId) -> StoreResult<Option<DeliveryStatus>> {
    self.inner.find_delivery_status(order_id).await
  }

  async fn insert_delivery_status_if_absent(&self, status: &DeliveryStatus) -> StoreResult<DeliveryStatus> {
    self.inner.insert_delivery_status_if_absent(status).await
  }

  async fn set_delivery_stage(
    &self,
    order_id: OrderId,
    stage: DeliveryStage,
    expected: Option<DeliveryStage>,
    at: DateTime<Utc>,
  ) -> StoreResult<Option<DeliveryStatus>> {
    self.inner.set_delivery_stage(order_id, stage, expected, at).await
  }
}

pub fn flaky_lifecycle() -> (Arc<FlakyStore>, OrderLifecycle) {
  let store = Arc::new(FlakyStore::default());
  let lifecycle = OrderLifecycle::new(store.clone(), LifecycleConfig::default());
  (store, lifecycle)
}
