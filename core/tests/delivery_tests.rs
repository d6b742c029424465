// tests/delivery_tests.rs
mod common;

use common::*;
use orderflow::{DeliveryStage, InvalidInput, LifecycleConfig, LifecycleError, MemoryStore, OrderLifecycle};
use std::sync::Arc;

#[tokio::test]
async fn test_get_status_creates_placed_once() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();

  let first = lifecycle.delivery.get_status(1001).await.unwrap();
  let second = lifecycle.delivery.get_status(1001).await.unwrap();

  assert_eq!(first.status, DeliveryStage::Placed);
  assert_eq!(first.order_id, 1001);
  assert_eq!(first, second);
}

#[tokio::test]
async fn test_implicit_advance_walks_every_stage_then_fails() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();
  let delivery = &lifecycle.delivery;

  let mut seen = Vec::new();
  for _ in 0..3 {
    seen.push(delivery.advance_status(7, None).await.unwrap().status);
  }
  assert_eq!(
    seen,
    vec![DeliveryStage::Packed, DeliveryStage::OutForDelivery, DeliveryStage::Delivered]
  );

  let err = delivery.advance_status(7, None).await.unwrap_err();
  assert!(matches!(err, LifecycleError::AlreadyTerminal { order_id: 7 }));
  assert_eq!(err.to_string(), "Order 7 is already delivered");
}

#[tokio::test]
async fn test_advance_from_never_seen_order_starts_at_placed() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();

  let status = lifecycle.delivery.advance_status(55, None).await.unwrap();
  assert_eq!(status.status, DeliveryStage::Packed);
}

#[tokio::test]
async fn test_invalid_target_lists_valid_stages() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();

  let err = lifecycle.delivery.advance_status(3, Some("SHIPPED")).await.unwrap_err();
  assert!(matches!(
    err,
    LifecycleError::InvalidInput(InvalidInput::UnknownStatus { ref given }) if given == "SHIPPED"
  ));
  let message = err.to_string();
  for stage in DeliveryStage::ALL {
    assert!(message.contains(stage.as_str()), "{message} is missing {stage}");
  }
}

#[tokio::test]
async fn test_empty_target_advances_one_step() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();
  let status = lifecycle.delivery.advance_status(4, Some("")).await.unwrap();
  assert_eq!(status.status, DeliveryStage::Packed);
}

#[tokio::test]
async fn test_explicit_target_may_jump_backward_by_default() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();
  let delivery = &lifecycle.delivery;

  let delivered = delivery.advance_status(8, Some("DELIVERED")).await.unwrap();
  assert_eq!(delivered.status, DeliveryStage::Delivered);

  let back = delivery.advance_status(8, Some("PACKED")).await.unwrap();
  assert_eq!(back.status, DeliveryStage::Packed);
  assert!(back.updated_at >= delivered.updated_at);
  assert_eq!(back.id, delivered.id);
}

#[tokio::test]
async fn test_strict_transitions_reject_backward_target() {
  setup_tracing();
  let lifecycle = OrderLifecycle::new(
    Arc::new(MemoryStore::new()),
    LifecycleConfig {
      strict_status_transitions: true,
    },
  );
  let delivery = &lifecycle.delivery;

  delivery.advance_status(2, Some("OUT_FOR_DELIVERY")).await.unwrap();
  let err = delivery.advance_status(2, Some("PLACED")).await.unwrap_err();
  assert!(matches!(err, LifecycleError::Conflict(_)));

  // Setting the current stage again is not a backward move.
  let same = delivery.advance_status(2, Some("OUT_FOR_DELIVERY")).await.unwrap();
  assert_eq!(same.status, DeliveryStage::OutForDelivery);
}

#[tokio::test]
async fn test_every_update_refreshes_updated_at() {
  setup_tracing();
  let (_store, lifecycle) = memory_lifecycle();
  let delivery = &lifecycle.delivery;

  let created = delivery.get_status(12).await.unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let advanced = delivery.advance_status(12, None).await.unwrap();
  assert!(advanced.updated_at > created.updated_at);
}
