// core/src/sequence.rs

use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::store::{SequenceStore, SharedStore};

/// Counter name for cart line ids.
pub const CART_ITEMS: &str = "cart_items";
/// Counter name for order ids.
pub const ORDERS: &str = "orders";
/// Counter name for delivery status record ids.
pub const DELIVERY_STATUSES: &str = "delivery_statuses";

/// Issues strictly increasing ids per entity type.
///
/// Uniqueness rests entirely on the store's atomic increment, so any number of
/// generators, in any number of processes, can share one store. Ids consumed
/// by an operation that later fails are not reused.
#[derive(Clone)]
pub struct SequenceGenerator {
  store: SharedStore,
}

impl SequenceGenerator {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  #[instrument(name = "SequenceGenerator::next_id", skip(self), err(Display))]
  pub async fn next_id(&self, entity_type: &str) -> Result<i64> {
    let id = self.store.increment(entity_type).await.map_err(|e| {
      warn!(error = %e, "Counter increment failed.");
      e
    })?;
    debug!(id, "Issued id.");
    Ok(id)
  }
}
