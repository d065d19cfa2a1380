use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::User};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.users.list_users().await?;

    Ok(Json(users))
}
