mod groceries;
mod health;
mod orders;
mod users;

use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/users", get(users::list_users))
        .route(
            "/groceries",
            get(groceries::list_groceries).post(groceries::create_grocery),
        )
        .route(
            "/groceries/:id",
            get(groceries::get_grocery)
                .patch(groceries::update_grocery)
                .delete(groceries::delete_grocery),
        )
        .route("/groceries/:id/inventory", put(groceries::adjust_inventory))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders/:id", get(orders::get_order))
}
