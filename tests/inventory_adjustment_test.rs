mod common;

use grocery_back::{AppError, services::inventory_service, store::AdjustmentPolicy};
use rust_decimal::dec;

#[tokio::test]
async fn restock_increases_quantity_on_hand() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 10).await;

    let quantity = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        milk.id,
        5,
    )
    .await
    .unwrap();

    assert_eq!(quantity, 15);
    assert_eq!(common::quantity_of(&state, milk.id).await, 15);
}

#[tokio::test]
async fn clamp_policy_floors_negative_results_at_zero() {
    let state = common::memory_state_with_policy(AdjustmentPolicy::Clamp);
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 3).await;

    let quantity = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        milk.id,
        -10,
    )
    .await
    .unwrap();

    assert_eq!(quantity, 0);
    assert_eq!(common::quantity_of(&state, milk.id).await, 0);
}

#[tokio::test]
async fn reject_policy_refuses_an_underflowing_adjustment() {
    let state = common::memory_state_with_policy(AdjustmentPolicy::Reject);
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 3).await;

    let err = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        milk.id,
        -10,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(common::quantity_of(&state, milk.id).await, 3);

    // An adjustment landing exactly on zero is still allowed
    let quantity = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        milk.id,
        -3,
    )
    .await
    .unwrap();
    assert_eq!(quantity, 0);
}

#[tokio::test]
async fn adjusting_an_unknown_item_is_not_found() {
    let state = common::memory_state();

    let err = inventory_service::adjust_quantity(
        state.inventory.as_ref(),
        state.adjustment_policy,
        999,
        5,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_adjustments_do_not_lose_updates() {
    let state = common::memory_state();
    let milk = common::seed_grocery(&state, "Milk", dec!(2.50), 0).await;

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let inventory = state.inventory.clone();
        let policy = state.adjustment_policy;
        let id = milk.id;
        tasks.push(tokio::spawn(async move {
            inventory_service::adjust_quantity(inventory.as_ref(), policy, id, 5).await
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(common::quantity_of(&state, milk.id).await, 50);
}
