use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{
        CreateGroceryRequest, GroceryItem, Order, OrderItem, UpdateGroceryRequest, User,
    },
    store::{
        AdjustOutcome, AdjustmentPolicy, DecrementOutcome, DeleteOutcome, InventoryStore,
        OrderStore, UserStore,
    },
};

/// Postgres-backed store. Stock mutations are single guarded UPDATE
/// statements, so the row lock serializes concurrent check-and-write pairs.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn find_grocery(&self, id: i32) -> Result<Option<GroceryItem>> {
        let item = sqlx::query_as::<_, GroceryItem>("SELECT * FROM grocery_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn list_groceries(&self) -> Result<Vec<GroceryItem>> {
        let items = sqlx::query_as::<_, GroceryItem>(
            "SELECT * FROM grocery_items ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn insert_grocery(&self, req: &CreateGroceryRequest) -> Result<GroceryItem> {
        let item = sqlx::query_as::<_, GroceryItem>(
            "INSERT INTO grocery_items (name, price, quantity, category, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.price)
        .bind(req.quantity)
        .bind(req.category)
        .bind(req.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_grocery(
        &self,
        id: i32,
        req: &UpdateGroceryRequest,
    ) -> Result<Option<GroceryItem>> {
        let mut query_builder =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE grocery_items SET ");
        let mut has_fields = false;

        if let Some(ref name) = req.name {
            query_builder.push("name = ");
            query_builder.push_bind(name);
            has_fields = true;
        }

        if let Some(price) = req.price {
            if has_fields {
                query_builder.push(", ");
            }
            query_builder.push("price = ");
            query_builder.push_bind(price);
            has_fields = true;
        }

        if let Some(quantity) = req.quantity {
            if has_fields {
                query_builder.push(", ");
            }
            query_builder.push("quantity = ");
            query_builder.push_bind(quantity);
            has_fields = true;
        }

        if let Some(category) = req.category {
            if has_fields {
                query_builder.push(", ");
            }
            query_builder.push("category = ");
            query_builder.push_bind(category);
            has_fields = true;
        }

        if !has_fields {
            return self.find_grocery(id).await;
        }

        query_builder.push(", updated_at = NOW() WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        let item = query_builder
            .build_query_as::<GroceryItem>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn delete_grocery(&self, id: i32) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM grocery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            // Order history still references the row
            Err(sqlx::Error::Database(ref db)) if db.is_foreign_key_violation() => {
                Ok(DeleteOutcome::Referenced)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn decrement_if_available(&self, id: i32, amount: i32) -> Result<DecrementOutcome> {
        let price = sqlx::query_scalar::<_, Decimal>(
            "UPDATE grocery_items
             SET quantity = quantity - $2, updated_at = NOW()
             WHERE id = $1 AND quantity >= $2
             RETURNING price",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match price {
            Some(unit_price) => DecrementOutcome::Applied { unit_price },
            None => DecrementOutcome::Unavailable,
        })
    }

    async fn restore_quantity(&self, id: i32, amount: i32) -> Result<()> {
        let result = sqlx::query(
            "UPDATE grocery_items
             SET quantity = quantity + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!("Restore of {} units hit missing grocery item {}", amount, id);
        }

        Ok(())
    }

    async fn adjust_quantity(
        &self,
        id: i32,
        delta: i32,
        policy: AdjustmentPolicy,
    ) -> Result<AdjustOutcome> {
        match policy {
            AdjustmentPolicy::Clamp => {
                let quantity = sqlx::query_scalar::<_, i32>(
                    "UPDATE grocery_items
                     SET quantity = GREATEST(0, quantity + $2), updated_at = NOW()
                     WHERE id = $1
                     RETURNING quantity",
                )
                .bind(id)
                .bind(delta)
                .fetch_optional(&self.pool)
                .await?;

                Ok(match quantity {
                    Some(quantity) => AdjustOutcome::Applied { quantity },
                    None => AdjustOutcome::NotFound,
                })
            }
            AdjustmentPolicy::Reject => {
                let quantity = sqlx::query_scalar::<_, i32>(
                    "UPDATE grocery_items
                     SET quantity = quantity + $2, updated_at = NOW()
                     WHERE id = $1 AND quantity + $2 >= 0
                     RETURNING quantity",
                )
                .bind(id)
                .bind(delta)
                .fetch_optional(&self.pool)
                .await?;

                match quantity {
                    Some(quantity) => Ok(AdjustOutcome::Applied { quantity }),
                    // The guard rejects both missing rows and underflow;
                    // a plain read tells the cases apart
                    None => {
                        if self.find_grocery(id).await?.is_some() {
                            Ok(AdjustOutcome::WouldGoNegative)
                        } else {
                            Ok(AdjustOutcome::NotFound)
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, user_id: i32, address: &str) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, address, total_amount)
             VALUES ($1, $2, 0)
             RETURNING *",
        )
        .bind(user_id)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn insert_order_item(
        &self,
        order_id: i32,
        grocery_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<OrderItem> {
        let item = sqlx::query_as::<_, OrderItem>(
            "INSERT INTO order_items (order_id, grocery_id, quantity, price_at_purchase)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(order_id)
        .bind(grocery_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn set_order_total(&self, order_id: i32, total: Decimal) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET total_amount = $2, updated_at = NOW()
             WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .bind(total)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn discard_order(&self, order_id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_order(&self, id: i32) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let orders =
            sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(orders)
    }

    async fn items_for_order(&self, order_id: i32) -> Result<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn items_for_orders(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
