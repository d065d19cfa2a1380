use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateOrderRequest, OrderItem, OrderResponse},
    services::{order_service, stock_service, stock_service::StockCheck},
};

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("address is required".to_string()));
    }

    // Advisory pass before anything is written; the commit re-validates each
    // line atomically, since stock can move in between
    if let StockCheck::Rejected(rejection) =
        stock_service::verify_stock(state.inventory.as_ref(), &payload.items).await?
    {
        return Err(rejection.into());
    }

    let placed =
        order_service::place_order(state.inventory.clone(), state.orders.clone(), payload).await?;

    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>> {
    let order = state
        .orders
        .find_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    let items = state.orders.items_for_order(id).await?;

    Ok(Json(OrderResponse { order, items }))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>> {
    let orders = state.orders.list_orders().await?;

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let all_items = state.orders.items_for_orders(&order_ids).await?;

    let mut items_map: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in all_items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    let response = orders
        .into_iter()
        .map(|order| {
            let items = items_map.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect();

    Ok(Json(response))
}
