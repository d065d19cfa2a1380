mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use grocery_back::{AppState, routes};
use http_body_util::BodyExt;
use rust_decimal::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(state: &AppState) -> Router {
    routes::create_router().with_state(state.clone())
}

async fn send(
    state: &AppState,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        // Some framework-level rejections (e.g. the JSON extractor refusing an
        // unknown enum variant) reply with a plain-text body rather than JSON.
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

#[tokio::test]
async fn health_check_responds_ok() {
    let state = common::memory_state();

    let (status, body) = send(&state, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&state, "GET", "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn lists_the_seeded_users() {
    let state = common::memory_state();

    let (status, body) = send(&state, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["role"], "admin");
    assert_eq!(users[1]["role"], "user");
}

#[tokio::test]
async fn placing_an_order_returns_created_with_totals() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(10.99), 100).await;

    let (status, body) = send(
        &state,
        "POST",
        "/orders",
        Some(json!({
            "user_id": 2,
            "address": "123 Main St",
            "items": [{ "grocery_id": milk.id, "quantity": 2 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["status"], "created");
    assert_eq!(body["order"]["total_amount"], "21.98");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["price_at_purchase"], "10.99");

    assert_eq!(common::quantity_of(&state, milk.id).await, 98);
}

#[tokio::test]
async fn short_stock_is_reported_as_a_client_error() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 1).await;

    let (status, body) = send(
        &state,
        "POST",
        "/orders",
        Some(json!({
            "user_id": 2,
            "address": "123 Main St",
            "items": [{ "grocery_id": milk.id, "quantity": 2 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(common::quantity_of(&state, milk.id).await, 1);
}

#[tokio::test]
async fn ordering_an_unknown_grocery_is_not_found() {
    let state = common::memory_state();

    let (status, body) = send(
        &state,
        "POST",
        "/orders",
        Some(json!({
            "user_id": 2,
            "address": "123 Main St",
            "items": [{ "grocery_id": 999, "quantity": 1 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn only_admins_can_create_groceries() {
    let state = common::memory_state();

    let payload = json!({
        "user_id": 2,
        "name": "Bread",
        "price": "1.20",
        "quantity": 10,
        "category": "bakery"
    });

    let (status, body) = send(&state, "POST", "/groceries", Some(payload)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let payload = json!({
        "user_id": 1,
        "name": "Bread",
        "price": "1.20",
        "quantity": 10,
        "category": "bakery"
    });

    let (status, body) = send(&state, "POST", "/groceries", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Bread");
    assert_eq!(body["quantity"], 10);
}

#[tokio::test]
async fn unknown_category_is_rejected_at_the_boundary() {
    let state = common::memory_state();

    let (status, _) = send(
        &state,
        "POST",
        "/groceries",
        Some(json!({
            "user_id": 1,
            "name": "Sword",
            "price": "99.99",
            "quantity": 1,
            "category": "weapons"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn adjusts_inventory_through_the_admin_endpoint() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 100).await;

    let (status, body) = send(
        &state,
        "PUT",
        &format!("/groceries/{}/inventory", milk.id),
        Some(json!({ "user_id": 1, "delta": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 105);

    // Non-admin callers are turned away before any mutation
    let (status, _) = send(
        &state,
        "PUT",
        &format!("/groceries/{}/inventory", milk.id),
        Some(json!({ "user_id": 2, "delta": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(common::quantity_of(&state, milk.id).await, 105);
}

#[tokio::test]
async fn deleting_a_grocery_referenced_by_orders_is_refused() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 10).await;

    let (status, _) = send(
        &state,
        "POST",
        "/orders",
        Some(json!({
            "user_id": 2,
            "address": "123 Main St",
            "items": [{ "grocery_id": milk.id, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &state,
        "DELETE",
        &format!("/groceries/{}?user_id=1", milk.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let bread = common::seed_grocery(&state, "Bread", dec!(1.20), 10).await;
    let (status, _) = send(
        &state,
        "DELETE",
        &format!("/groceries/{}?user_id=1", bread.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn fetching_a_missing_grocery_is_not_found() {
    let state = common::memory_state();

    let (status, body) = send(&state, "GET", "/groceries/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn order_listing_includes_line_items() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 10).await;

    let (status, created) = send(
        &state,
        "POST",
        "/orders",
        Some(json!({
            "user_id": 2,
            "address": "123 Main St",
            "items": [{ "grocery_id": milk.id, "quantity": 4 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&state, "GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);

    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order"]["id"], created["order"]["id"]);
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);

    let order_id = created["order"]["id"].as_i64().unwrap();
    let (status, body) = send(&state, "GET", &format!("/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["total_amount"], "10.00");
}
