//! # market-db: Database Layer for the Marketplace
//!
//! This crate provides database access for the marketplace backend.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Marketplace Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /transaction/create)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    market-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  item, user,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  review, ...  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│               │    │ 0001_init    │  │   │
//! │  │   │               │◄───│ PurchaseProc. │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, user, review and ledger repositories
//! - [`purchase`] - The atomic purchase transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./market.db")).await?;
//!
//! let items = db.items().search("lamp", None).await?;
//! let entry = db.purchases().purchase(items[0].id, buyer_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod purchase;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use purchase::{PurchaseError, PurchaseProcessor};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::item::ItemRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
