use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;

use crate::{
    AppState,
    error::{AppError, Result},
    middleware,
    models::{
        AdjustInventoryRequest, AdjustInventoryResponse, CreateGroceryRequest, DeleteGroceryQuery,
        GroceryItem, UpdateGroceryRequest,
    },
    services::inventory_service,
    store::DeleteOutcome,
};

pub async fn list_groceries(State(state): State<AppState>) -> Result<Json<Vec<GroceryItem>>> {
    let items = state.inventory.list_groceries().await?;

    Ok(Json(items))
}

pub async fn get_grocery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GroceryItem>> {
    let item = state
        .inventory
        .find_grocery(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("grocery item {} not found", id)))?;

    Ok(Json(item))
}

pub async fn create_grocery(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroceryRequest>,
) -> Result<(StatusCode, Json<GroceryItem>)> {
    middleware::require_admin(state.users.as_ref(), payload.user_id).await?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    if payload.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be greater than 0".to_string()));
    }

    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = state.inventory.insert_grocery(&payload).await?;

    tracing::info!("Created grocery item {} ({})", item.id, item.name);

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_grocery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGroceryRequest>,
) -> Result<Json<GroceryItem>> {
    middleware::require_admin(state.users.as_ref(), payload.user_id).await?;

    if let Some(price) = payload.price {
        if price <= Decimal::ZERO {
            return Err(AppError::BadRequest("price must be greater than 0".to_string()));
        }
    }

    if let Some(quantity) = payload.quantity {
        if quantity < 0 {
            return Err(AppError::BadRequest("quantity must not be negative".to_string()));
        }
    }

    let item = state
        .inventory
        .update_grocery(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("grocery item {} not found", id)))?;

    Ok(Json(item))
}

pub async fn delete_grocery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<DeleteGroceryQuery>,
) -> Result<StatusCode> {
    middleware::require_admin(state.users.as_ref(), params.user_id).await?;

    match state.inventory.delete_grocery(id).await? {
        DeleteOutcome::Deleted => {
            tracing::info!("Deleted grocery item {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(AppError::NotFound(format!(
            "grocery item {} not found",
            id
        ))),
        DeleteOutcome::Referenced => Err(AppError::BadRequest(format!(
            "grocery item {} is referenced by existing orders",
            id
        ))),
    }
}

pub async fn adjust_inventory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AdjustInventoryRequest>,
) -> Result<Json<AdjustInventoryResponse>> {
    middleware::require_admin(state.users.as_ref(), payload.user_id).await?;

    let quantity = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        id,
        payload.delta,
    )
    .await?;

    Ok(Json(AdjustInventoryResponse { id, quantity }))
}
