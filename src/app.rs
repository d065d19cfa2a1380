use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::cors::CorsLayer;

use crate::{
    config::AppConfig,
    database,
    error::Result,
    routes,
    store::{AdjustmentPolicy, InventoryStore, OrderStore, PgStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryStore>,
    pub orders: Arc<dyn OrderStore>,
    pub users: Arc<dyn UserStore>,
    pub adjustment_policy: AdjustmentPolicy,
}

impl AppState {
    /// One backend value serves all three store roles.
    pub fn from_store<S>(store: Arc<S>, adjustment_policy: AdjustmentPolicy) -> Self
    where
        S: InventoryStore + OrderStore + UserStore + 'static,
    {
        Self {
            inventory: store.clone(),
            orders: store.clone(),
            users: store,
            adjustment_policy,
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let store = Arc::new(PgStore::new(pool));
    let state = AppState::from_store(store, config.inventory.adjustment_policy);

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
