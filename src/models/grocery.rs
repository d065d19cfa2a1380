use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// DB models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "grocery_category", rename_all = "lowercase")]
pub enum Category {
    Frozen,
    Bakery,
    Beverages,
    Dairy,
    Snacks,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroceryItem {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: Category,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request types

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroceryRequest {
    pub user_id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: Category,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroceryRequest {
    pub user_id: i32,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustInventoryRequest {
    pub user_id: i32,
    pub delta: i32,
}

// Caller id travels in the query string on DELETE; there is no token auth
#[derive(Debug, Deserialize)]
pub struct DeleteGroceryQuery {
    pub user_id: i32,
}

// Response types

#[derive(Debug, Serialize)]
pub struct AdjustInventoryResponse {
    pub id: i32,
    pub quantity: i32,
}
