// core/src/store/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use super::{cart_matches_snapshot, CartStore, DeliveryStore, OrderStore, SequenceStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{CartAddition, CartLine, DeliveryStage, DeliveryStatus, Order, OrderId, ProductId, UserId};

#[derive(Debug, Default)]
struct MemoryState {
  counters: HashMap<String, i64>,
  cart_lines: BTreeMap<(UserId, ProductId), CartLine>,
  orders: Vec<Order>,
  delivery_statuses: HashMap<OrderId, DeliveryStatus>,
}

/// In-process store. One mutex guards all collections, so every trait
/// method is atomic with respect to every other.
#[derive(Debug, Default)]
pub struct MemoryStore {
  state: Mutex<MemoryState>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SequenceStore for MemoryStore {
  async fn increment(&self, entity: &str) -> StoreResult<i64> {
    let mut state = self.state.lock();
    let counter = state.counters.entry(entity.to_string()).or_insert(0);
    *counter += 1;
    Ok(*counter)
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn merge_into_cart_line(&self, addition: &CartAddition) -> StoreResult<Option<CartLine>> {
    let mut state = self.state.lock();
    match state.cart_lines.get_mut(&(addition.user_id, addition.product_id)) {
      Some(line) => {
        line.absorb(addition)?;
        Ok(Some(line.clone()))
      }
      None => Ok(None),
    }
  }

  async fn insert_or_merge_cart_line(&self, line: &CartLine) -> StoreResult<CartLine> {
    let mut state = self.state.lock();
    let stored = match state.cart_lines.entry((line.user_id, line.product_id)) {
      Entry::Occupied(mut existing) => {
        existing.get_mut().absorb(&CartAddition::from(line))?;
        existing.into_mut()
      }
      Entry::Vacant(slot) => slot.insert(line.clone()),
    };
    Ok(stored.clone())
  }

  async fn delete_cart_line(&self, user_id: UserId, product_id: ProductId) -> StoreResult<bool> {
    Ok(self.state.lock().cart_lines.remove(&(user_id, product_id)).is_some())
  }

  async fn list_cart_lines(&self, user_id: UserId) -> StoreResult<Vec<CartLine>> {
    Ok(
      self
        .state
        .lock()
        .cart_lines
        .range((user_id, ProductId::MIN)..=(user_id, ProductId::MAX))
        .map(|(_, line)| line.clone())
        .collect(),
    )
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn commit_order(&self, order: &Order, consumed: &[CartLine]) -> StoreResult<()> {
    let mut state = self.state.lock();
    let user_id = order.user_id;
    let current: Vec<CartLine> = state
      .cart_lines
      .range((user_id, ProductId::MIN)..=(user_id, ProductId::MAX))
      .map(|(_, line)| line.clone())
      .collect();

    if !cart_matches_snapshot(&current, consumed) {
      return Err(StoreError::Conflict(format!(
        "cart for user {user_id} changed during checkout"
      )));
    }

    state.cart_lines.retain(|(owner, _), _| *owner != user_id);
    state.orders.push(order.clone());
    Ok(())
  }

  async fn list_orders(&self, user_id: UserId) -> StoreResult<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .state
      .lock()
      .orders
      .iter()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect();
    orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    Ok(orders)
  }
}

#[async_trait]
impl DeliveryStore for MemoryStore {
  async fn find_delivery_status(&self, order_id: OrderId) -> StoreResult<Option<DeliveryStatus>> {
    Ok(self.state.lock().delivery_statuses.get(&order_id).cloned())
  }

  async fn insert_delivery_status_if_absent(&self, status: &DeliveryStatus) -> StoreResult<DeliveryStatus> {
    let mut state = self.state.lock();
    Ok(
      state
        .delivery_statuses
        .entry(status.order_id)
        .or_insert_with(|| status.clone())
        .clone(),
    )
  }

  async fn set_delivery_stage(
    &self,
    order_id: OrderId,
    stage: DeliveryStage,
    expected: Option<DeliveryStage>,
    at: DateTime<Utc>,
  ) -> StoreResult<Option<DeliveryStatus>> {
    let mut state = self.state.lock();
    let Some(record) = state.delivery_statuses.get_mut(&order_id) else {
      return Ok(None);
    };
    if expected.is_some_and(|expected| record.status != expected) {
      return Ok(None);
    }
    record.status = stage;
    record.updated_at = at;
    Ok(Some(record.clone()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn counters_start_at_one_per_entity() {
    let store = MemoryStore::new();
    assert_eq!(store.increment("orders").await.unwrap(), 1);
    assert_eq!(store.increment("orders").await.unwrap(), 2);
    assert_eq!(store.increment("cart_items").await.unwrap(), 1);
  }

  #[tokio::test]
  async fn insert_or_merge_folds_into_existing_line() {
    let store = MemoryStore::new();
    let first = CartLine::from_addition(1, &CartAddition::new(5, 9, 2).with_price(3.0));
    let racer = CartLine::from_addition(2, &CartAddition::new(5, 9, 1));

    store.insert_or_merge_cart_line(&first).await.unwrap();
    let merged = store.insert_or_merge_cart_line(&racer).await.unwrap();

    assert_eq!(merged.id, 1);
    assert_eq!(merged.quantity, 3);
    assert_eq!(merged.unit_price, Some(3.0));
    assert_eq!(store.list_cart_lines(5).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn list_cart_lines_is_scoped_to_user() {
    let store = MemoryStore::new();
    for (id, user) in [(1, 1), (2, 2), (3, 1)] {
      let line = CartLine::from_addition(id, &CartAddition::new(user, id * 10, 1));
      store.insert_or_merge_cart_line(&line).await.unwrap();
    }
    let lines = store.list_cart_lines(1).await.unwrap();
    assert_eq!(lines.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
  }

  #[tokio::test]
  async fn compare_and_set_rejects_stale_stage() {
    let store = MemoryStore::new();
    let status = DeliveryStatus {
      id: 1,
      order_id: 77,
      status: DeliveryStage::Packed,
      updated_at: Utc::now(),
    };
    store.insert_delivery_status_if_absent(&status).await.unwrap();

    let stale = store
      .set_delivery_stage(77, DeliveryStage::Packed, Some(DeliveryStage::Placed), Utc::now())
      .await
      .unwrap();
    assert!(stale.is_none());

    let advanced = store
      .set_delivery_stage(77, DeliveryStage::OutForDelivery, Some(DeliveryStage::Packed), Utc::now())
      .await
      .unwrap();
    assert_eq!(advanced.map(|s| s.status), Some(DeliveryStage::OutForDelivery));
  }
}
