// apps/storefront_app/src/db/postgres.rs

//! PostgreSQL implementation of the lifecycle store ports. Every method is a
//! single statement except `commit_order`, which runs in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orderflow::model::{OrderId, ProductId, UserId};
use orderflow::store::{cart_matches_snapshot, CartStore, DeliveryStore, OrderStore, SequenceStore};
use orderflow::{
  CartAddition, CartLine, DeliveryStage, DeliveryStatus, InvalidInput, Order, OrderLineItem, OrderReference,
  StoreError, StoreResult,
};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument, warn};

const CART_LINE_COLUMNS: &str = "id, user_id, product_id, product_name, product_price, quantity";
const ORDER_COLUMNS: &str = "id, user_id, order_reference, total_amount, created_at, line_items";
const DELIVERY_COLUMNS: &str = "id, order_id, status, updated_at";

/// SQLSTATE `numeric_value_out_of_range`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn corrupt(message: String) -> StoreError {
  StoreError::Unavailable(anyhow::anyhow!(message))
}

/// Cart quantity writes overflow the INTEGER column on oversized merges;
/// that is a rejected input, not an outage.
fn cart_write_error(product_id: ProductId) -> impl FnOnce(sqlx::Error) -> StoreError {
  move |err| match &err {
    sqlx::Error::Database(db) if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
      InvalidInput::QuantityOverflow { product_id }.into()
    }
    _ => StoreError::unavailable(err),
  }
}

#[derive(Debug, FromRow)]
struct CartLineRow {
  id: i64,
  user_id: i64,
  product_id: i64,
  product_name: Option<String>,
  product_price: Option<f64>,
  quantity: i32,
}

impl From<CartLineRow> for CartLine {
  fn from(row: CartLineRow) -> Self {
    CartLine {
      id: row.id,
      user_id: row.user_id,
      product_id: row.product_id,
      product_name: row.product_name,
      unit_price: row.product_price,
      quantity: row.quantity,
    }
  }
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: i64,
  user_id: i64,
  order_reference: String,
  total_amount: f64,
  created_at: DateTime<Utc>,
  line_items: Json<Vec<OrderLineItem>>,
}

impl TryFrom<OrderRow> for Order {
  type Error = StoreError;

  fn try_from(row: OrderRow) -> StoreResult<Self> {
    let order_reference = OrderReference::parse(&row.order_reference)
      .ok_or_else(|| corrupt(format!("order {} has malformed reference '{}'", row.id, row.order_reference)))?;
    Ok(Order {
      id: row.id,
      user_id: row.user_id,
      order_reference,
      total_amount: row.total_amount,
      created_at: row.created_at,
      line_items: row.line_items.0,
    })
  }
}

#[derive(Debug, FromRow)]
struct DeliveryRow {
  id: i64,
  order_id: i64,
  status: String,
  updated_at: DateTime<Utc>,
}

impl TryFrom<DeliveryRow> for DeliveryStatus {
  type Error = StoreError;

  fn try_from(row: DeliveryRow) -> StoreResult<Self> {
    let status: DeliveryStage = row.status.parse().map_err(StoreError::unavailable)?;
    Ok(DeliveryStatus {
      id: row.id,
      order_id: row.order_id,
      status,
      updated_at: row.updated_at,
    })
  }
}

#[async_trait]
impl SequenceStore for PgStore {
  #[instrument(skip(self), err(Display))]
  async fn increment(&self, entity: &str) -> StoreResult<i64> {
    sqlx::query_scalar::<_, i64>(
      "INSERT INTO counters (entity_type, sequence_value) VALUES ($1, 1) \
       ON CONFLICT (entity_type) DO UPDATE SET sequence_value = counters.sequence_value + 1 \
       RETURNING sequence_value",
    )
    .bind(entity)
    .fetch_one(&self.pool)
    .await
    .map_err(StoreError::unavailable)
  }
}

#[async_trait]
impl CartStore for PgStore {
  #[instrument(skip(self, addition), fields(user_id = addition.user_id, product_id = addition.product_id), err(Display))]
  async fn merge_into_cart_line(&self, addition: &CartAddition) -> StoreResult<Option<CartLine>> {
    let row = sqlx::query_as::<_, CartLineRow>(&format!(
      "UPDATE cart_items SET quantity = quantity + $3, \
         product_name = COALESCE($4, product_name), \
         product_price = COALESCE($5, product_price) \
       WHERE user_id = $1 AND product_id = $2 \
       RETURNING {CART_LINE_COLUMNS}"
    ))
    .bind(addition.user_id)
    .bind(addition.product_id)
    .bind(addition.quantity)
    .bind(addition.product_name.as_deref())
    .bind(addition.unit_price)
    .fetch_optional(&self.pool)
    .await
    .map_err(cart_write_error(addition.product_id))?;
    Ok(row.map(CartLine::from))
  }

  #[instrument(skip(self, line), fields(line_id = line.id, user_id = line.user_id), err(Display))]
  async fn insert_or_merge_cart_line(&self, line: &CartLine) -> StoreResult<CartLine> {
    let row = sqlx::query_as::<_, CartLineRow>(&format!(
      "INSERT INTO cart_items ({CART_LINE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
       ON CONFLICT (user_id, product_id) DO UPDATE SET \
         quantity = cart_items.quantity + EXCLUDED.quantity, \
         product_name = COALESCE(EXCLUDED.product_name, cart_items.product_name), \
         product_price = COALESCE(EXCLUDED.product_price, cart_items.product_price) \
       RETURNING {CART_LINE_COLUMNS}"
    ))
    .bind(line.id)
    .bind(line.user_id)
    .bind(line.product_id)
    .bind(line.product_name.as_deref())
    .bind(line.unit_price)
    .bind(line.quantity)
    .fetch_one(&self.pool)
    .await
    .map_err(cart_write_error(line.product_id))?;

    if row.id != line.id {
      debug!(issued_id = line.id, kept_id = row.id, "Concurrent insert merged into existing cart line");
    }
    Ok(row.into())
  }

  async fn delete_cart_line(&self, user_id: UserId, product_id: ProductId) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(StoreError::unavailable)?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_cart_lines(&self, user_id: UserId) -> StoreResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(&format!(
      "SELECT {CART_LINE_COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY product_id"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(StoreError::unavailable)?;
    Ok(rows.into_iter().map(CartLine::from).collect())
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(skip(self, order, consumed), fields(order_id = order.id, user_id = order.user_id), err(Display))]
  async fn commit_order(&self, order: &Order, consumed: &[CartLine]) -> StoreResult<()> {
    let mut tx = self.pool.begin().await.map_err(StoreError::unavailable)?;

    let removed: Vec<CartLine> = sqlx::query_as::<_, CartLineRow>(&format!(
      "DELETE FROM cart_items WHERE user_id = $1 RETURNING {CART_LINE_COLUMNS}"
    ))
    .bind(order.user_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(StoreError::unavailable)?
    .into_iter()
    .map(CartLine::from)
    .collect();

    if !cart_matches_snapshot(&removed, consumed) {
      warn!(removed = removed.len(), expected = consumed.len(), "Cart changed during checkout; rolling back");
      tx.rollback().await.map_err(StoreError::unavailable)?;
      return Err(StoreError::Conflict(format!(
        "cart for user {} changed during checkout",
        order.user_id
      )));
    }

    sqlx::query(&format!(
      "INSERT INTO orders ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
    ))
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.order_reference.as_str())
    .bind(order.total_amount)
    .bind(order.created_at)
    .bind(Json(&order.line_items))
    .execute(&mut *tx)
    .await
    .map_err(StoreError::unavailable)?;

    tx.commit().await.map_err(StoreError::unavailable)
  }

  async fn list_orders(&self, user_id: UserId) -> StoreResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(StoreError::unavailable)?;
    rows.into_iter().map(Order::try_from).collect()
  }
}

#[async_trait]
impl DeliveryStore for PgStore {
  async fn find_delivery_status(&self, order_id: OrderId) -> StoreResult<Option<DeliveryStatus>> {
    sqlx::query_as::<_, DeliveryRow>(&format!(
      "SELECT {DELIVERY_COLUMNS} FROM delivery_statuses WHERE order_id = $1"
    ))
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(StoreError::unavailable)?
    .map(DeliveryStatus::try_from)
    .transpose()
  }

  #[instrument(skip(self, status), fields(order_id = status.order_id), err(Display))]
  async fn insert_delivery_status_if_absent(&self, status: &DeliveryStatus) -> StoreResult<DeliveryStatus> {
    sqlx::query(&format!(
      "INSERT INTO delivery_statuses ({DELIVERY_COLUMNS}) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (order_id) DO NOTHING"
    ))
    .bind(status.id)
    .bind(status.order_id)
    .bind(status.status.as_str())
    .bind(status.updated_at)
    .execute(&self.pool)
    .await
    .map_err(StoreError::unavailable)?;

    self
      .find_delivery_status(status.order_id)
      .await?
      .ok_or_else(|| corrupt(format!("delivery status for order {} vanished after insert", status.order_id)))
  }

  #[instrument(skip(self, at), err(Display))]
  async fn set_delivery_stage(
    &self,
    order_id: OrderId,
    stage: DeliveryStage,
    expected: Option<DeliveryStage>,
    at: DateTime<Utc>,
  ) -> StoreResult<Option<DeliveryStatus>> {
    sqlx::query_as::<_, DeliveryRow>(&format!(
      "UPDATE delivery_statuses SET status = $2, updated_at = $3 \
       WHERE order_id = $1 AND ($4::TEXT IS NULL OR status = $4) \
       RETURNING {DELIVERY_COLUMNS}"
    ))
    .bind(order_id)
    .bind(stage.as_str())
    .bind(at)
    .bind(expected.map(DeliveryStage::as_str))
    .fetch_optional(&self.pool)
    .await
    .map_err(StoreError::unavailable)?
    .map(DeliveryStatus::try_from)
    .transpose()
  }
}
