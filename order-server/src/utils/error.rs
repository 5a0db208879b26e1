//! Unified error handling
//!
//! Application error enum plus the API response envelope every handler
//! returns.
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Request / business errors | E0003 not found |
//! | E2xxx  | Authorization | E2001 forbidden |
//! | E3xxx  | Authentication | E3001 missing identity |
//! | E9xxx  | System / operational | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::orders::ManagerError;

/// Uniform API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 on success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Identity (4xx) ==========
    #[error("Authentication required")]
    /// Missing or malformed actor identity (401)
    Unauthorized,

    #[error("Permission denied: {0}")]
    /// Actor may not touch this resource (403)
    Forbidden(String),

    // ========== Business logic (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Resource does not exist (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// Malformed input (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// Well-formed request the lifecycle rules refuse (422)
    BusinessRule(String),

    // ========== System (5xx) ==========
    #[error("Cancellation incomplete: {0}")]
    /// Stock restore did not fully complete; needs reconciliation (500)
    CancellationIncomplete(String),

    #[error("Database error: {0}")]
    /// Storage failure (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// Anything else (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Authentication required",
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            AppError::CancellationIncomplete(msg) => {
                error!(target: "orders", error = %msg, "Cancellation left stock unreconciled");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9003", msg.as_str())
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

// ========== Conversions from the domain layers ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(e: ManagerError) -> Self {
        match e {
            ManagerError::EmptyCart
            | ManagerError::InsufficientStock(_)
            | ManagerError::InvalidTransition { .. }
            | ManagerError::SettlementFailed(_) => AppError::BusinessRule(e.to_string()),
            ManagerError::ProductNotFound(_) | ManagerError::OrderNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            ManagerError::Forbidden => AppError::Forbidden("Not your order".to_string()),
            ManagerError::CancellationFailed { .. } => {
                AppError::CancellationIncomplete(e.to_string())
            }
            ManagerError::Storage(inner) => inner.into(),
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
