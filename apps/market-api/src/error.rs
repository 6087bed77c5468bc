//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Marketplace API                    │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ├── ValidationError ──► 400 VALIDATION_ERROR                    │
//! │         ├── CoreError ────────► kind() → 404 / 400                      │
//! │         ├── PurchaseError ────► 404 / 400 OUT_OF_STOCK / 500            │
//! │         ├── DbError ──────────► 404 / 400 / 500 (detail only in logs)   │
//! │         └── JSON / path / query rejection ──► 400                       │
//! │                                                                         │
//! │  Client receives: { "error": "Item is out of stock",                    │
//! │                     "code":  "OUT_OF_STOCK" }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use market_core::{CoreError, ErrorKind, ValidationError};
use market_db::{DbError, PurchaseError};

/// Message returned for every internal failure.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "error": "Item not found",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Duplicate or still-referenced row (400)
    Conflict,

    /// Purchase of an item with no stock left (400)
    OutOfStock,

    /// Internal server error (500)
    Internal,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: ErrorCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error ("Item not found").
    pub fn not_found(entity: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{entity} not found"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::Conflict, message)
    }

    /// Creates an internal error. The detail is logged, never returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", detail);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            INTERNAL_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::not_found(&entity),
            DbError::UniqueViolation { field, .. } => {
                tracing::warn!(field = %field, "Unique constraint violation");
                ApiError::conflict("Already exists")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::conflict("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::validation("Invalid value")
            }
            other => ApiError::internal(other),
        }
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::EmailTaken(_) | CoreError::StillReferenced { .. } => ErrorCode::Conflict,
            CoreError::NothingToUpdate | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::ItemNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::ReviewNotFound(_) => ErrorCode::NotFound,
        };
        ApiError::new(status_for(err.kind()), code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts purchase outcomes to API errors.
///
/// ```text
/// ItemNotFound  → 404 "Item not found"
/// BuyerNotFound → 404 "Buyer not found"
/// OutOfStock    → 400 "Item is out of stock"
/// Internal      → 500 "Internal Server Error" (rolled back, logged)
/// ```
impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::Internal(db) => ApiError::internal(db),
            business => {
                let code = match business {
                    PurchaseError::OutOfStock(_) => ErrorCode::OutOfStock,
                    _ => ErrorCode::NotFound,
                };
                ApiError::new(status_for(business.kind()), code, business.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        ApiError::validation("Invalid JSON body")
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameter: {}", rejection.body_text());
        ApiError::validation("Invalid path parameter")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::validation("Invalid query parameters")
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
