// core/src/lib.rs

//! Orderflow: the order lifecycle core of a retail storefront.
//!
//! Three services share one store:
//!  - [`SequenceGenerator`] issues strictly increasing ids per entity type
//!    through a single atomic increment in the store.
//!  - [`CartManager`] owns cart line mutation and the cart-to-order
//!    checkout, which snapshots the cart into an immutable [`Order`] and
//!    clears the cart in one store transaction.
//!  - [`DeliveryEngine`] tracks each order through
//!    `PLACED -> PACKED -> OUT_FOR_DELIVERY -> DELIVERED`.
//!
//! Persistence is behind the async traits in [`store`]; [`MemoryStore`] is the
//! in-process implementation used by tests and single-node deployments.

pub mod cart;
pub mod delivery;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod sequence;
pub mod store;

pub use crate::cart::CartManager;
pub use crate::delivery::DeliveryEngine;
pub use crate::error::{InvalidInput, LifecycleError, PipelineError, Result, StoreError, StoreResult};
pub use crate::lifecycle::{LifecycleConfig, OrderLifecycle};
pub use crate::model::{
  CartAddition, CartLine, DeliveryStage, DeliveryStatus, Order, OrderLineItem, OrderReference,
};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::sequence::SequenceGenerator;
pub use crate::store::{MemoryStore, SharedStore, Store};
