// core/src/model/mod.rs

//! Records persisted by the lifecycle core.

pub mod cart_line;
pub mod delivery;
pub mod order;

pub use cart_line::{CartAddition, CartLine};
pub use delivery::{DeliveryStage, DeliveryStatus};
pub use order::{Order, OrderLineItem, OrderReference};

pub type UserId = i64;
pub type ProductId = i64;
pub type OrderId = i64;
