// core/src/lifecycle.rs

use crate::cart::CartManager;
use crate::delivery::DeliveryEngine;
use crate::sequence::SequenceGenerator;
use crate::store::SharedStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleConfig {
  /// Reject explicit delivery targets that lie behind the current stage.
  pub strict_status_transitions: bool,
}

/// The three lifecycle services wired to one store.
#[derive(Clone)]
pub struct OrderLifecycle {
  pub sequence: SequenceGenerator,
  pub cart: CartManager,
  pub delivery: DeliveryEngine,
}

impl OrderLifecycle {
  pub fn new(store: SharedStore, config: LifecycleConfig) -> Self {
    let sequence = SequenceGenerator::new(store.clone());
    Self {
      cart: CartManager::new(store.clone(), sequence.clone()),
      delivery: DeliveryEngine::new(store, sequence.clone(), config.strict_status_transitions),
      sequence,
    }
  }
}
