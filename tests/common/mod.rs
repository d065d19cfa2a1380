#![allow(dead_code)]

use std::sync::Arc;

use grocery_back::{
    app::AppState,
    models::{Category, CreateGroceryRequest, GroceryItem},
    store::{AdjustmentPolicy, MemoryStore},
};
use rust_decimal::Decimal;

pub fn memory_state() -> AppState {
    memory_state_with_policy(AdjustmentPolicy::Clamp)
}

pub fn memory_state_with_policy(policy: AdjustmentPolicy) -> AppState {
    AppState::from_store(Arc::new(MemoryStore::new()), policy)
}

pub async fn seed_grocery(
    state: &AppState,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> GroceryItem {
    state
        .inventory
        .insert_grocery(&CreateGroceryRequest {
            user_id: 1,
            name: name.to_string(),
            price,
            quantity,
            category: Category::Dairy,
        })
        .await
        .expect("failed to seed grocery item")
}

pub async fn quantity_of(state: &AppState, id: i32) -> i32 {
    state
        .inventory
        .find_grocery(id)
        .await
        .expect("failed to read grocery item")
        .expect("grocery item missing")
        .quantity
}
