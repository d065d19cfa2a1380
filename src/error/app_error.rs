use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    ConfigError(String),
    InternalError(String),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    InvalidQuantity(String),
    OutOfStock(String),
    InsufficientStock(String),
    ConcurrencyConflict(String),
    ReconciliationRequired(String),
}

impl AppError {
    /// Machine-readable kind carried in the response body, so callers can
    /// branch without parsing the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::ConfigError(_) => "config_error",
            AppError::InternalError(_) => "internal_error",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::InvalidQuantity(_) => "invalid_quantity",
            AppError::OutOfStock(_) => "out_of_stock",
            AppError::InsufficientStock(_) => "insufficient_stock",
            AppError::ConcurrencyConflict(_) => "concurrency_conflict",
            AppError::ReconciliationRequired(_) => "reconciliation_required",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "database error: {}", e),
            AppError::ConfigError(msg) => write!(f, "configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            AppError::InvalidQuantity(msg) => write!(f, "invalid quantity: {}", msg),
            AppError::OutOfStock(msg) => write!(f, "out of stock: {}", msg),
            AppError::InsufficientStock(msg) => write!(f, "insufficient stock: {}", msg),
            AppError::ConcurrencyConflict(msg) => write!(f, "concurrency conflict: {}", msg),
            AppError::ReconciliationRequired(msg) => {
                write!(f, "manual reconciliation required: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error_message) = match self {
            AppError::DatabaseError(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server configuration error".to_string(),
                )
            }
            AppError::InternalError(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            AppError::ReconciliationRequired(ref msg) => {
                // Stock compensation failed partway; operator attention needed
                tracing::error!("Reconciliation required: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::OutOfStock(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InsufficientStock(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ConcurrencyConflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": kind,
            "message": error_message,
        }));

        (status, body).into_response()
    }
}
