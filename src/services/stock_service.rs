use crate::{
    error::{AppError, Result},
    models::BasketItem,
    store::InventoryStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    UnknownGrocery,
    InvalidQuantity,
    OutOfStock,
    InsufficientStock,
}

#[derive(Debug, Clone)]
pub struct StockRejection {
    pub line: usize,
    pub grocery_id: i32,
    pub name: Option<String>,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone)]
pub enum StockCheck {
    Admitted,
    Rejected(StockRejection),
}

/// Advisory, read-only pass over the basket, line by line in basket order.
/// The authoritative check happens again inside the commit, where the
/// decrement is conditional; stock can move between this pass and the commit
/// under concurrent load.
pub async fn verify_stock(
    inventory: &dyn InventoryStore,
    items: &[BasketItem],
) -> Result<StockCheck> {
    for (line, item) in items.iter().enumerate() {
        let grocery = match inventory.find_grocery(item.grocery_id).await? {
            Some(grocery) => grocery,
            None => {
                return Ok(StockCheck::Rejected(StockRejection {
                    line,
                    grocery_id: item.grocery_id,
                    name: None,
                    reason: RejectionReason::UnknownGrocery,
                }))
            }
        };

        let reason = if item.quantity <= 0 {
            Some(RejectionReason::InvalidQuantity)
        } else if grocery.quantity == 0 {
            Some(RejectionReason::OutOfStock)
        } else if grocery.quantity < item.quantity {
            Some(RejectionReason::InsufficientStock)
        } else {
            None
        };

        if let Some(reason) = reason {
            return Ok(StockCheck::Rejected(StockRejection {
                line,
                grocery_id: item.grocery_id,
                name: Some(grocery.name),
                reason,
            }));
        }
    }

    Ok(StockCheck::Admitted)
}

impl StockRejection {
    fn label(&self) -> String {
        match self.name {
            Some(ref name) => name.clone(),
            None => format!("grocery item {}", self.grocery_id),
        }
    }
}

impl From<StockRejection> for AppError {
    fn from(rejection: StockRejection) -> Self {
        let label = rejection.label();
        match rejection.reason {
            RejectionReason::UnknownGrocery => {
                AppError::NotFound(format!("{} not found", label))
            }
            RejectionReason::InvalidQuantity => AppError::InvalidQuantity(format!(
                "{} quantity should be greater than 0",
                label
            )),
            RejectionReason::OutOfStock => {
                AppError::OutOfStock(format!("{} is out of stock", label))
            }
            RejectionReason::InsufficientStock => AppError::InsufficientStock(format!(
                "{} does not have enough stock",
                label
            )),
        }
    }
}
