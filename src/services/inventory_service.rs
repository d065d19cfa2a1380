use crate::{
    error::{AppError, Result},
    store::{AdjustOutcome, AdjustmentPolicy, InventoryStore},
};

/// Applies a manual stock correction (positive restock or negative
/// adjustment) outside the order flow, through the same atomic update
/// discipline the order path uses. Returns the new quantity on hand.
pub async fn adjust_quantity(
    inventory: &dyn InventoryStore,
    policy: AdjustmentPolicy,
    grocery_id: i32,
    delta: i32,
) -> Result<i32> {
    match inventory.adjust_quantity(grocery_id, delta, policy).await? {
        AdjustOutcome::Applied { quantity } => {
            tracing::info!(
                "Adjusted grocery item {} by {}, quantity now {}",
                grocery_id,
                delta,
                quantity
            );
            Ok(quantity)
        }
        AdjustOutcome::NotFound => Err(AppError::NotFound(format!(
            "grocery item {} not found",
            grocery_id
        ))),
        AdjustOutcome::WouldGoNegative => Err(AppError::BadRequest(format!(
            "adjustment of {} would drive grocery item {} below zero",
            delta, grocery_id
        ))),
    }
}
