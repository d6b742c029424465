// core/src/cart/add_pipeline.rs

use std::sync::Arc;
use tracing::{info, warn};

use super::contexts::AddToCartCtxData;
use crate::error::{InvalidInput, LifecycleError, Result};
use crate::model::CartLine;
use crate::pipeline::{ContextData, Pipeline, PipelineControl, SkipCondition};
use crate::sequence::CART_ITEMS;
use crate::store::CartStore;

pub const MERGE_INTO_EXISTING_LINE: &str = "merge_into_existing_line";
pub const INSERT_NEW_LINE: &str = "insert_new_line";

/// Add-to-cart as a find-or-create that never produces a second line for
/// the same (user, product): merge first, and only when nothing was there
/// issue an id and insert, with the insert itself falling back to a merge.
/// Input is validated in a before-handler so nothing is written for a bad add.
pub fn build_add_to_cart_pipeline() -> Pipeline<AddToCartCtxData, LifecycleError> {
  let line_already_written: SkipCondition<AddToCartCtxData> =
    Arc::new(|ctx: ContextData<AddToCartCtxData>| ctx.read().cart_line.is_some());

  let mut p = Pipeline::<AddToCartCtxData, LifecycleError>::new(&[
    (MERGE_INTO_EXISTING_LINE, None),
    (INSERT_NEW_LINE, Some(line_already_written)),
  ]);

  p.before_root(MERGE_INTO_EXISTING_LINE, validate_cart_input);
  p.on_root(MERGE_INTO_EXISTING_LINE, merge_into_existing_line);
  p.on_root(INSERT_NEW_LINE, insert_new_line);
  p
}

async fn validate_cart_input(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let quantity = ctx.read().addition.quantity;
  if quantity < 1 {
    warn!(quantity, "Rejected non-positive quantity.");
    return Err(InvalidInput::NonPositiveQuantity(quantity).into());
  }
  Ok(PipelineControl::Continue)
}

async fn merge_into_existing_line(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let (store, addition) = {
    let guard = ctx.read();
    (guard.deps.store.clone(), guard.addition.clone())
  };

  let merged = store.merge_into_cart_line(&addition).await?;
  if let Some(line) = &merged {
    info!(line_id = line.id, quantity = line.quantity, "Merged into existing cart line.");
  }
  ctx.write().cart_line = merged;
  Ok(PipelineControl::Continue)
}

async fn insert_new_line(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let (deps, addition) = {
    let guard = ctx.read();
    (guard.deps.clone(), guard.addition.clone())
  };

  let id = deps.sequence.next_id(CART_ITEMS).await?;
  let stored = deps
    .store
    .insert_or_merge_cart_line(&CartLine::from_addition(id, &addition))
    .await?;

  if stored.id == id {
    info!(line_id = id, quantity = stored.quantity, "Inserted new cart line.");
  } else {
    // A concurrent add created the line first; ours was folded into it.
    info!(line_id = stored.id, unused_id = id, "Cart line appeared concurrently, merged.");
  }
  ctx.write().cart_line = Some(stored);
  Ok(PipelineControl::Continue)
}
