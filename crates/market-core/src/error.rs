//! # Error Types
//!
//! Domain-specific error types for market-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  market-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule failures                           │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Taxonomy every error is classified into        │
//! │                                                                         │
//! │  market-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── PurchaseError    - Purchase processor outcomes                    │
//! │                                                                         │
//! │  market-api errors (in app)                                            │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON body              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The taxonomy every marketplace failure falls into.
///
/// ## Mapping
/// ```text
/// NotFound      item / buyer / user / review absent
/// InvalidInput  missing or out-of-range fields
/// Conflict      out of stock, duplicate email, delete of referenced row
/// Internal      storage fault, unexpected failure
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    Internal,
}

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule failures.
///
/// The `Display` strings are the messages returned to the client, so they
/// stay short and free of storage detail.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No item with the given id.
    #[error("Item not found")]
    ItemNotFound(i64),

    /// No user with the given id or email.
    #[error("User not found")]
    UserNotFound(String),

    /// No review with the given id.
    #[error("Review not found")]
    ReviewNotFound(i64),

    /// The item has no stock left.
    ///
    /// ## When This Occurs
    /// ```text
    /// Buyer clicks "Buy" on an item with quantity 0
    ///      │
    ///      ▼
    /// OutOfStock { item_id }
    ///      │
    ///      ▼
    /// UI shows: "Item is out of stock"
    /// ```
    #[error("Item is out of stock")]
    OutOfStock { item_id: i64 },

    /// Another user already registered this email.
    #[error("Email already exists")]
    EmailTaken(String),

    /// The row is still referenced (e.g. an item with recorded transactions).
    #[error("{entity} is referenced by existing records")]
    StillReferenced { entity: String },

    /// A partial update carried no fields.
    #[error("No fields to update")]
    NothingToUpdate,

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error into the taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ItemNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::ReviewNotFound(_) => ErrorKind::NotFound,
            CoreError::OutOfStock { .. }
            | CoreError::EmailTaken(_)
            | CoreError::StillReferenced { .. } => ErrorKind::Conflict,
            CoreError::NothingToUpdate | CoreError::Validation(_) => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are detected before any storage call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required fields are missing or empty.
    #[error("Missing required fields")]
    MissingFields,

    /// A field is required but missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. an email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
