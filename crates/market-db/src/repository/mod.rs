//! # Repository Module
//!
//! Database repository implementations for the marketplace.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.items().search("lamp", None)                               │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── list / list_by_seller                                             │
//! │  ├── get_by_id / get_detail                                            │
//! │  ├── search / search_by_seller                                         │
//! │  └── create / update / delete                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository holds a clone of the pool and returns
//! [`DbResult`](crate::DbResult). Lookups return `Option`; mutations that
//! target a missing row return [`DbError::NotFound`](crate::DbError).
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Catalog CRUD and substring search
//! - [`category::CategoryRepository`] - Category listing
//! - [`user::UserRepository`] - Users and email lookup
//! - [`review::ReviewRepository`] - Item reviews
//! - [`ledger::LedgerRepository`] - Read-only ledger queries
//!
//! Ledger writes live in [`crate::purchase`], not here.

pub mod category;
pub mod item;
pub mod ledger;
pub mod review;
pub mod user;

use sqlx::SqlitePool;

use crate::error::DbResult;

/// `SELECT EXISTS` on a primary key. Table and column are compile-time
/// constants, never user input.
pub(crate) async fn row_exists(
    pool: &SqlitePool,
    table: &'static str,
    id_column: &'static str,
    id: i64,
) -> DbResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_column} = ?1)");
    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

/// Search key for `title_folded` / `name_folded`. SQLite's `lower()` only
/// folds ASCII, so the folding happens here on both the stored and the
/// queried side.
pub(crate) fn fold_case(s: &str) -> String {
    s.trim().to_lowercase()
}
