use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, Result},
    models::{
        CreateGroceryRequest, GroceryItem, Order, OrderItem, OrderStatus, UpdateGroceryRequest,
        User, UserRole,
    },
    store::{
        AdjustOutcome, AdjustmentPolicy, DecrementOutcome, DeleteOutcome, InventoryStore,
        OrderStore, UserStore,
    },
};

/// In-process store. Every mutation runs under the write half of a single
/// `RwLock`, so check-and-write pairs on the same grocery are serialized the
/// same way the guarded UPDATE serializes them in Postgres.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    groceries: HashMap<i32, GroceryItem>,
    orders: HashMap<i32, Order>,
    order_items: Vec<OrderItem>,
    users: HashMap<i32, User>,
    next_grocery_id: i32,
    next_order_id: i32,
    next_order_item_id: i32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Starts with the same two accounts the migrations seed: an admin and a
    /// regular user.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner.seed_user(1, "admin", "Test", "Admin", "admin@user.com", UserRole::Admin);
        inner.seed_user(2, "user", "Test", "User", "user@user.com", UserRole::User);
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl Inner {
    fn seed_user(
        &mut self,
        id: i32,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        role: UserRole,
    ) {
        let now = Utc::now();
        self.users.insert(
            id,
            User {
                id,
                username: username.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                role,
                created_at: now,
                updated_at: now,
            },
        );
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_grocery(&self, id: i32) -> Result<Option<GroceryItem>> {
        let inner = self.inner.read().await;
        Ok(inner.groceries.get(&id).cloned())
    }

    async fn list_groceries(&self) -> Result<Vec<GroceryItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<GroceryItem> = inner.groceries.values().cloned().collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn insert_grocery(&self, req: &CreateGroceryRequest) -> Result<GroceryItem> {
        let mut inner = self.inner.write().await;
        inner.next_grocery_id += 1;
        let now = Utc::now();
        let item = GroceryItem {
            id: inner.next_grocery_id,
            name: req.name.clone(),
            price: req.price,
            quantity: req.quantity,
            category: req.category,
            created_by: req.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.groceries.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_grocery(
        &self,
        id: i32,
        req: &UpdateGroceryRequest,
    ) -> Result<Option<GroceryItem>> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.groceries.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(ref name) = req.name {
            item.name = name.clone();
        }
        if let Some(price) = req.price {
            item.price = price;
        }
        if let Some(quantity) = req.quantity {
            item.quantity = quantity;
        }
        if let Some(category) = req.category {
            item.category = category;
        }
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete_grocery(&self, id: i32) -> Result<DeleteOutcome> {
        let mut inner = self.inner.write().await;
        if !inner.groceries.contains_key(&id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if inner.order_items.iter().any(|item| item.grocery_id == id) {
            return Ok(DeleteOutcome::Referenced);
        }
        inner.groceries.remove(&id);
        Ok(DeleteOutcome::Deleted)
    }

    async fn decrement_if_available(&self, id: i32, amount: i32) -> Result<DecrementOutcome> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.groceries.get_mut(&id) else {
            return Ok(DecrementOutcome::Unavailable);
        };
        if item.quantity < amount {
            return Ok(DecrementOutcome::Unavailable);
        }
        item.quantity -= amount;
        item.updated_at = Utc::now();
        Ok(DecrementOutcome::Applied {
            unit_price: item.price,
        })
    }

    async fn restore_quantity(&self, id: i32, amount: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.groceries.get_mut(&id) {
            Some(item) => {
                item.quantity += amount;
                item.updated_at = Utc::now();
            }
            None => {
                tracing::warn!("Restore of {} units hit missing grocery item {}", amount, id);
            }
        }
        Ok(())
    }

    async fn adjust_quantity(
        &self,
        id: i32,
        delta: i32,
        policy: AdjustmentPolicy,
    ) -> Result<AdjustOutcome> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.groceries.get_mut(&id) else {
            return Ok(AdjustOutcome::NotFound);
        };

        let adjusted = item.quantity + delta;
        if adjusted < 0 && policy == AdjustmentPolicy::Reject {
            return Ok(AdjustOutcome::WouldGoNegative);
        }

        item.quantity = adjusted.max(0);
        item.updated_at = Utc::now();
        Ok(AdjustOutcome::Applied {
            quantity: item.quantity,
        })
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, user_id: i32, address: &str) -> Result<Order> {
        let mut inner = self.inner.write().await;
        inner.next_order_id += 1;
        let now = Utc::now();
        let order = Order {
            id: inner.next_order_id,
            status: OrderStatus::Created,
            total_amount: Decimal::ZERO,
            user_id,
            address: address.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn insert_order_item(
        &self,
        order_id: i32,
        grocery_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<OrderItem> {
        let mut inner = self.inner.write().await;
        inner.next_order_item_id += 1;
        let item = OrderItem {
            id: inner.next_order_item_id,
            order_id,
            grocery_id,
            quantity,
            price_at_purchase: unit_price,
            created_at: Utc::now(),
        };
        inner.order_items.push(item.clone());
        Ok(item)
    }

    async fn set_order_total(&self, order_id: i32, total: Decimal) -> Result<Order> {
        let mut inner = self.inner.write().await;
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))?;
        order.total_amount = total;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn discard_order(&self, order_id: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.order_items.retain(|item| item.order_id != order_id);
        inner.orders.remove(&order_id);
        Ok(())
    }

    async fn find_order(&self, id: i32) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.get(&id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }

    async fn items_for_order(&self, order_id: i32) -> Result<Vec<OrderItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn items_for_orders(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order_items
            .iter()
            .filter(|item| order_ids.contains(&item.order_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }
}
