mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::Result,
    models::{
        CreateGroceryRequest, GroceryItem, Order, OrderItem, UpdateGroceryRequest, User,
    },
};

/// Outcome of the conditional stock decrement. On success the unit price is
/// the value read in the same atomic step as the decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    Applied { unit_price: Decimal },
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    Applied { quantity: i32 },
    WouldGoNegative,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Referenced,
    NotFound,
}

/// How a negative inventory adjustment that exceeds the current quantity is
/// handled: floor the result at zero, or refuse the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentPolicy {
    Clamp,
    Reject,
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_grocery(&self, id: i32) -> Result<Option<GroceryItem>>;
    async fn list_groceries(&self) -> Result<Vec<GroceryItem>>;
    async fn insert_grocery(&self, req: &CreateGroceryRequest) -> Result<GroceryItem>;
    async fn update_grocery(
        &self,
        id: i32,
        req: &UpdateGroceryRequest,
    ) -> Result<Option<GroceryItem>>;
    async fn delete_grocery(&self, id: i32) -> Result<DeleteOutcome>;

    /// Decrements `quantity` by `amount` only while `quantity >= amount`,
    /// returning the unit price read in the same step. Callers targeting the
    /// same grocery observe a strict serialization of the check-and-decrement
    /// pair; there is no window between the read and the write.
    async fn decrement_if_available(&self, id: i32, amount: i32) -> Result<DecrementOutcome>;

    /// Adds `amount` back after an aborted commit. Unconditional.
    async fn restore_quantity(&self, id: i32, amount: i32) -> Result<()>;

    /// Applies `delta` (restock or correction) under the given policy, with
    /// the same serialization guarantee as the decrement.
    async fn adjust_quantity(
        &self,
        id: i32,
        delta: i32,
        policy: AdjustmentPolicy,
    ) -> Result<AdjustOutcome>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order header with a zero total and `created` status.
    async fn insert_order(&self, user_id: i32, address: &str) -> Result<Order>;
    async fn insert_order_item(
        &self,
        order_id: i32,
        grocery_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<OrderItem>;
    async fn set_order_total(&self, order_id: i32, total: Decimal) -> Result<Order>;

    /// Removes the header and any lines of an aborted commit attempt.
    async fn discard_order(&self, order_id: i32) -> Result<()>;

    async fn find_order(&self, id: i32) -> Result<Option<Order>>;
    async fn list_orders(&self) -> Result<Vec<Order>>;
    async fn items_for_order(&self, order_id: i32) -> Result<Vec<OrderItem>>;
    async fn items_for_orders(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: i32) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
}
