//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Business-rule rejections
//! map to 4xx responses; persistence failures map to 5xx and never
//! leak their details to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Checkout & payment rules
    #[error("Not enough stock for {product}: only {available} left")]
    InsufficientStock {
        product_id: Uuid,
        product: String,
        available: i32,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid address")]
    InvalidAddress,

    #[error("No default address found. Please add one.")]
    NoDefaultAddress,

    #[error("Order is not pending")]
    NotPending,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::EmptyCart => "EMPTY_CART",
            AppError::InvalidAddress => "INVALID_ADDRESS",
            AppError::NoDefaultAddress => "NO_DEFAULT_ADDRESS",
            AppError::NotPending => "NOT_PENDING",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound | AppError::InvalidAddress => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::InsufficientStock { .. }
            | AppError::EmptyCart
            | AppError::NoDefaultAddress
            | AppError::NotPending
            | AppError::InvalidStatus(_)
            | AppError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// `Conflict(msg)` for a unique-constraint violation, `Database` otherwise.
    pub fn unique_violation(err: sea_orm::DbErr, msg: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(msg.into()),
            _ => AppError::Database(err),
        }
    }

    /// `Conflict(msg)` for a foreign-key violation, `Database` otherwise.
    pub fn referenced(err: sea_orm::DbErr, msg: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::Conflict(msg.into())
            }
            _ => AppError::Database(err),
        }
    }

    pub fn insufficient_stock(product_id: Uuid, product: impl Into<String>, available: i32) -> Self {
        AppError::InsufficientStock {
            product_id,
            product: product.into(),
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_client_errors() {
        let errors = [
            AppError::EmptyCart,
            AppError::NoDefaultAddress,
            AppError::NotPending,
            AppError::InvalidStatus("LOST".to_string()),
            AppError::insufficient_stock(Uuid::new_v4(), "Lamp", 1),
        ];

        for error in errors {
            assert_eq!(error.status(), StatusCode::BAD_REQUEST, "{}", error.code());
        }
    }

    #[test]
    fn test_invalid_address_is_not_found() {
        assert_eq!(AppError::InvalidAddress.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidAddress.code(), "INVALID_ADDRESS");
    }

    #[test]
    fn test_insufficient_stock_names_product() {
        let error = AppError::insufficient_stock(Uuid::new_v4(), "Desk Lamp", 3);
        assert_eq!(error.to_string(), "Not enough stock for Desk Lamp: only 3 left");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = AppError::internal("connection pool exhausted");
        assert_eq!(error.user_message(), "An internal error occurred");
    }
}
