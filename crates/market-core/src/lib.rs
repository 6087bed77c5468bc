//! # market-core: Pure Domain Model for the Marketplace
//!
//! This crate holds the marketplace's domain types, money arithmetic,
//! error taxonomy and input validation. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Marketplace Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web Client (single-page app)                    │   │
//! │  │    Item list ──► Item details ──► Buy ──► Transactions view     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    market-api (axum routes)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ market-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │  Ledger   │  │           │  │ ErrorKind │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          market-db (SQLite, repositories, purchases)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, User, Category, Review, LedgerEntry)
//! - [`money`] - Integer-cents Money type (no floating point!)
//! - [`error`] - Domain error types and the error taxonomy
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use market_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! assert_eq!(price.to_string(), "$10.99");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest allowed review rating.
pub const MIN_RATING: i64 = 1;

/// Highest allowed review rating.
pub const MAX_RATING: i64 = 5;
