// tests/sequence_tests.rs
mod common;

use common::*;
use futures::future::join_all;
use orderflow::sequence::{CART_ITEMS, ORDERS};
use orderflow::{LifecycleError, MemoryStore, SequenceGenerator};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_first_id_for_new_entity_is_one() {
  setup_tracing();
  let generator = SequenceGenerator::new(Arc::new(MemoryStore::new()));

  assert_eq!(generator.next_id("widgets").await.unwrap(), 1);
  assert_eq!(generator.next_id("widgets").await.unwrap(), 2);
  assert_eq!(generator.next_id("gadgets").await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_never_share_an_id() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  // Separate generators over one store stand in for separate processes.
  let generators: Vec<SequenceGenerator> = (0..8).map(|_| SequenceGenerator::new(store.clone())).collect();

  let calls = 400;
  let handles = (0..calls).map(|i| {
    let generator = generators[i % generators.len()].clone();
    tokio::spawn(async move { generator.next_id(ORDERS).await.unwrap() })
  });
  let ids: Vec<i64> = join_all(handles).await.into_iter().map(|r| r.unwrap()).collect();

  let distinct: HashSet<i64> = ids.iter().copied().collect();
  assert_eq!(distinct.len(), calls);
  assert_eq!(ids.iter().copied().max(), Some(calls as i64));
}

#[tokio::test]
async fn test_ids_strictly_increase_per_caller() {
  setup_tracing();
  let generator = SequenceGenerator::new(Arc::new(MemoryStore::new()));
  let mut last = 0;
  for _ in 0..50 {
    let id = generator.next_id(CART_ITEMS).await.unwrap();
    assert!(id > last);
    last = id;
  }
}

#[tokio::test]
async fn test_store_outage_surfaces_as_store_unavailable() {
  setup_tracing();
  let (store, lifecycle) = flaky_lifecycle();
  store.fail_increments(true);

  let err = lifecycle.sequence.next_id(ORDERS).await.unwrap_err();
  assert!(matches!(err, LifecycleError::StoreUnavailable(_)), "got {err:?}");

  store.fail_increments(false);
  assert_eq!(lifecycle.sequence.next_id(ORDERS).await.unwrap(), 1);
}
