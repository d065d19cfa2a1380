use crate::{
    error::{AppError, Result},
    models::{User, UserRole},
    store::UserStore,
};

/// Role gate for administrative operations. The caller's id arrives in the
/// request itself (body field or query parameter) and the role is looked up
/// per request; there is no token layer in this system.
pub async fn require_admin(users: &dyn UserStore, user_id: i32) -> Result<User> {
    let user = users
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("unknown user {}", user_id)))?;

    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    Ok(user)
}
