// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::DeliveryStage;

/// Failures raised by the step pipeline engine itself, as opposed to failures
/// raised by the handlers it runs.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Pipeline '{pipeline}' finished without producing {missing}")]
  MissingOutput { pipeline: &'static str, missing: &'static str },

  #[error("Pipeline '{pipeline}' was halted before completion")]
  Halted { pipeline: &'static str },
}

/// Failures reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The backing store could not be reached or rejected the operation.
  #[error("store unavailable: {0}")]
  Unavailable(#[source] AnyhowError),

  /// The write would violate a data invariant; nothing was written.
  #[error("store rejected input: {0}")]
  Rejected(#[from] InvalidInput),

  /// A transactional precondition no longer held when the write was attempted.
  #[error("store conflict: {0}")]
  Conflict(String),
}

impl StoreError {
  pub fn unavailable<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    StoreError::Unavailable(AnyhowError::new(err))
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Reasons an input is rejected before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
  #[error("Cart is empty")]
  EmptyCart,

  #[error("Invalid status '{given}'. Must be one of: {}", valid_stage_list())]
  UnknownStatus { given: String },

  #[error("Quantity must be a positive number, got {0}")]
  NonPositiveQuantity(i32),

  #[error("Quantity for product {product_id} would exceed the maximum of {}", i32::MAX)]
  QuantityOverflow { product_id: i64 },
}

fn valid_stage_list() -> String {
  DeliveryStage::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error("Not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  InvalidInput(#[from] InvalidInput),

  #[error("Order {order_id} is already delivered")]
  AlreadyTerminal { order_id: i64 },

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Store unavailable: {0}")]
  StoreUnavailable(#[source] AnyhowError),

  #[error("Pipeline error: {0}")]
  Pipeline(#[from] PipelineError),
}

impl From<StoreError> for LifecycleError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Unavailable(source) => LifecycleError::StoreUnavailable(source),
      StoreError::Rejected(reason) => LifecycleError::InvalidInput(reason),
      StoreError::Conflict(message) => LifecycleError::Conflict(message),
    }
  }
}

pub type Result<T, E = LifecycleError> = std::result::Result<T, E>;
