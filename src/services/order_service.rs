use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{CreateOrderRequest, OrderResponse},
    store::{DecrementOutcome, InventoryStore, OrderStore},
};

/// Places an order: header first with a zero total, then one conditional
/// stock decrement per basket line with the unit price snapshotted in the
/// same atomic step, then the computed total. A failure on any line restores
/// every decrement from this attempt and discards the header and lines, so a
/// failed commit leaves no artifact.
///
/// The mutating section runs on its own task; a caller that disconnects
/// mid-commit cannot strand a half-applied basket.
pub async fn place_order(
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore>,
    req: CreateOrderRequest,
) -> Result<OrderResponse> {
    if req.items.is_empty() {
        return Err(AppError::BadRequest("basket is empty".to_string()));
    }

    for item in &req.items {
        if item.quantity <= 0 {
            return Err(AppError::InvalidQuantity(format!(
                "grocery item {} quantity should be greater than 0",
                item.grocery_id
            )));
        }
    }

    let task = tokio::spawn(commit_basket(inventory, orders, req));
    task.await
        .map_err(|e| AppError::InternalError(format!("order commit task failed: {}", e)))?
}

async fn commit_basket(
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore>,
    req: CreateOrderRequest,
) -> Result<OrderResponse> {
    let order = orders.insert_order(req.user_id, &req.address).await?;

    let mut decremented: Vec<(i32, i32)> = Vec::with_capacity(req.items.len());
    let mut total = Decimal::ZERO;

    for item in &req.items {
        // Each line is re-validated at mutation time: the decrement applies
        // only while enough stock remains, and the charged price is whatever
        // the same atomic step read.
        let unit_price = match inventory
            .decrement_if_available(item.grocery_id, item.quantity)
            .await
        {
            Ok(DecrementOutcome::Applied { unit_price }) => unit_price,
            Ok(DecrementOutcome::Unavailable) => {
                roll_back(&*inventory, &*orders, order.id, &decremented).await?;
                let label = match inventory.find_grocery(item.grocery_id).await {
                    Ok(Some(grocery)) => grocery.name,
                    _ => format!("grocery item {}", item.grocery_id),
                };
                return Err(AppError::ConcurrencyConflict(format!(
                    "stock of {} changed while the order was being placed",
                    label
                )));
            }
            Err(e) => {
                roll_back(&*inventory, &*orders, order.id, &decremented).await?;
                return Err(e);
            }
        };
        decremented.push((item.grocery_id, item.quantity));

        if let Err(e) = orders
            .insert_order_item(order.id, item.grocery_id, item.quantity, unit_price)
            .await
        {
            roll_back(&*inventory, &*orders, order.id, &decremented).await?;
            return Err(e);
        }

        total += unit_price * Decimal::from(item.quantity);
    }

    let order = match orders.set_order_total(order.id, total).await {
        Ok(order) => order,
        Err(e) => {
            roll_back(&*inventory, &*orders, order.id, &decremented).await?;
            return Err(e);
        }
    };

    let items = orders.items_for_order(order.id).await?;

    tracing::info!(
        "Placed order {} for user {}: {} line(s), total {}",
        order.id,
        order.user_id,
        items.len(),
        order.total_amount
    );

    Ok(OrderResponse { order, items })
}

/// Compensation for an aborted commit: every decrement from this attempt is
/// restored and the order header and any persisted lines are removed. A
/// failure here means stock no longer matches recorded orders, which is
/// surfaced as its own kind rather than swallowed.
async fn roll_back(
    inventory: &dyn InventoryStore,
    orders: &dyn OrderStore,
    order_id: i32,
    decremented: &[(i32, i32)],
) -> Result<()> {
    for &(grocery_id, amount) in decremented {
        if let Err(e) = inventory.restore_quantity(grocery_id, amount).await {
            return Err(AppError::ReconciliationRequired(format!(
                "order {}: failed to restore {} unit(s) of grocery item {}: {}",
                order_id, amount, grocery_id, e
            )));
        }
    }

    if let Err(e) = orders.discard_order(order_id).await {
        return Err(AppError::ReconciliationRequired(format!(
            "order {}: failed to discard after aborted commit: {}",
            order_id, e
        )));
    }

    tracing::warn!(
        "Order {} aborted; restored {} stock decrement(s)",
        order_id,
        decremented.len()
    );

    Ok(())
}
