// core/src/delivery.rs

//! Delivery status tracking: `PLACED -> PACKED -> OUT_FOR_DELIVERY -> DELIVERED`.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::error::{LifecycleError, Result};
use crate::model::{DeliveryStage, DeliveryStatus, OrderId};
use crate::sequence::{SequenceGenerator, DELIVERY_STATUSES};
use crate::store::{DeliveryStore, SharedStore};

#[derive(Clone)]
pub struct DeliveryEngine {
  store: SharedStore,
  sequence: SequenceGenerator,
  strict_transitions: bool,
}

impl DeliveryEngine {
  /// With `strict_transitions`, explicit targets behind the current stage are
  /// rejected. Without it any valid stage may be set directly.
  pub fn new(store: SharedStore, sequence: SequenceGenerator, strict_transitions: bool) -> Self {
    Self {
      store,
      sequence,
      strict_transitions,
    }
  }

  /// Returns the order's status record, creating it at `PLACED` on first
  /// access. Repeated calls before any update return the same record.
  #[instrument(name = "DeliveryEngine::get_status", skip(self), err(Display))]
  pub async fn get_status(&self, order_id: OrderId) -> Result<DeliveryStatus> {
    if let Some(existing) = self.store.find_delivery_status(order_id).await? {
      return Ok(existing);
    }

    let id = self.sequence.next_id(DELIVERY_STATUSES).await?;
    let fresh = DeliveryStatus {
      id,
      order_id,
      status: DeliveryStage::INITIAL,
      updated_at: Utc::now(),
    };
    let stored = self.store.insert_delivery_status_if_absent(&fresh).await?;
    if stored.id == id {
      info!(status_id = id, "Created initial delivery status.");
    }
    Ok(stored)
  }

  /// Moves the order to `target`, or one stage forward when no target is
  /// given. An empty target counts as no target.
  #[instrument(name = "DeliveryEngine::advance_status", skip(self), err(Display))]
  pub async fn advance_status(&self, order_id: OrderId, target: Option<&str>) -> Result<DeliveryStatus> {
    let target = match target.filter(|t| !t.is_empty()) {
      Some(raw) => Some(raw.parse::<DeliveryStage>()?),
      None => None,
    };

    let current = self.get_status(order_id).await?;

    let updated = match target {
      Some(stage) => self.set_explicit(&current, stage).await?,
      None => self.step_forward(&current).await?,
    };

    info!(from = %current.status, to = %updated.status, "Delivery status updated.");
    Ok(updated)
  }

  async fn set_explicit(&self, current: &DeliveryStatus, stage: DeliveryStage) -> Result<DeliveryStatus> {
    if stage < current.status {
      if self.strict_transitions {
        return Err(LifecycleError::Conflict(format!(
          "Cannot move order {} back from {} to {}",
          current.order_id, current.status, stage
        )));
      }
      warn!(from = %current.status, to = %stage, "Moving delivery status backward by explicit request.");
    }

    self
      .store
      .set_delivery_stage(current.order_id, stage, None, Utc::now())
      .await?
      .ok_or_else(|| LifecycleError::NotFound(format!("Delivery status for order {}", current.order_id)))
  }

  async fn step_forward(&self, current: &DeliveryStatus) -> Result<DeliveryStatus> {
    let next = current.status.next().ok_or(LifecycleError::AlreadyTerminal {
      order_id: current.order_id,
    })?;

    self
      .store
      .set_delivery_stage(current.order_id, next, Some(current.status), Utc::now())
      .await?
      .ok_or_else(|| {
        LifecycleError::Conflict(format!(
          "Delivery status for order {} changed concurrently; it is no longer {}",
          current.order_id, current.status
        ))
      })
  }
}
