//! # Purchase Processor
//!
//! The one operation in the marketplace that must be atomic: decrement an
//! item's stock by one and append a ledger entry, or do neither.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    purchase(item_id, buyer_id)                          │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE items SET quantity = quantity - 1                              │
//! │   WHERE id = ? AND quantity > 0 RETURNING …   ← takes the write lock   │
//! │    │                                                                    │
//! │    ├── no row ──► item exists? ── no ──► ItemNotFound  (ROLLBACK)      │
//! │    │                         └── yes ──► OutOfStock    (ROLLBACK)      │
//! │    ▼                                                                    │
//! │  buyer exists? ── no ──► BuyerNotFound (ROLLBACK undoes the decrement) │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  INSERT INTO transactions (… title, price snapshot, today …)           │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT ──► LedgerEntry                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The guarded decrement is the first statement of the transaction, so the
//! stock check and the write happen under SQLite's single write lock. A
//! second purchase of the same item waits on the busy timeout, then sees the
//! committed quantity. Two buyers racing for the last unit get exactly one
//! success and one `OutOfStock`; stock never goes negative.
//!
//! Purchases are not idempotent: calling twice buys two units.

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::ledger::LEDGER_COLUMNS;
use market_core::{ErrorKind, Item, LedgerEntry};

// =============================================================================
// Errors
// =============================================================================

/// Why a purchase did not happen. In every case no write is visible.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Item not found")]
    ItemNotFound(i64),

    #[error("Item is out of stock")]
    OutOfStock(i64),

    #[error("Buyer not found")]
    BuyerNotFound(i64),

    /// Storage failed somewhere inside the unit of work; it was rolled back.
    #[error("Internal Server Error")]
    Internal(#[from] DbError),
}

impl PurchaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PurchaseError::ItemNotFound(_) | PurchaseError::BuyerNotFound(_) => ErrorKind::NotFound,
            PurchaseError::OutOfStock(_) => ErrorKind::Conflict,
            PurchaseError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for PurchaseError {
    fn from(err: sqlx::Error) -> Self {
        PurchaseError::Internal(DbError::from(err))
    }
}

pub type PurchaseResult<T> = Result<T, PurchaseError>;

// =============================================================================
// Processor
// =============================================================================

/// Executes purchases against the pool.
///
/// ## Usage
/// ```rust,ignore
/// let entry = db.purchases().purchase(item_id, buyer_id).await?;
/// assert_eq!(entry.seller_id, item.seller_id);
/// ```
#[derive(Debug, Clone)]
pub struct PurchaseProcessor {
    pool: SqlitePool,
}

impl PurchaseProcessor {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseProcessor { pool }
    }

    /// Buys one unit of `item_id` for `buyer_id`, dated today (UTC).
    pub async fn purchase(&self, item_id: i64, buyer_id: i64) -> PurchaseResult<LedgerEntry> {
        self.purchase_on(item_id, buyer_id, Utc::now().date_naive())
            .await
    }

    /// Buys one unit of `item_id` for `buyer_id` with an explicit ledger date.
    ///
    /// ## Returns
    /// * `Ok(LedgerEntry)` - Stock decremented, entry committed
    /// * `Err(ItemNotFound | OutOfStock | BuyerNotFound)` - Nothing written
    /// * `Err(Internal)` - Storage failure, rolled back
    pub async fn purchase_on(
        &self,
        item_id: i64,
        buyer_id: i64,
        date: NaiveDate,
    ) -> PurchaseResult<LedgerEntry> {
        debug!(item_id = item_id, buyer_id = buyer_id, "Starting purchase");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Check and decrement in one statement
        let sold = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET quantity = quantity - 1
            WHERE id = ?1 AND quantity > 0
            RETURNING id, title, description, price_cents, quantity, seller_id, category_id
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let item = match sold {
            Some(item) => item,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1)")
                        .bind(item_id)
                        .fetch_one(&mut *tx)
                        .await?;

                let err = if exists {
                    PurchaseError::OutOfStock(item_id)
                } else {
                    PurchaseError::ItemNotFound(item_id)
                };
                return abort(tx, err).await;
            }
        };

        let buyer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)")
                .bind(buyer_id)
                .fetch_one(&mut *tx)
                .await?;

        if !buyer_exists {
            return abort(tx, PurchaseError::BuyerNotFound(buyer_id)).await;
        }

        // Seller, title and price come from the row just locked, never the client
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"
            INSERT INTO transactions (item_id, buyer_id, seller_id, item_title, price_cents, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {LEDGER_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(buyer_id)
        .bind(item.seller_id)
        .bind(&item.title)
        .bind(item.price_cents)
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            trans_id = entry.trans_id,
            item_id = item.id,
            buyer_id = buyer_id,
            seller_id = item.seller_id,
            price = %entry.price(),
            remaining = item.quantity,
            "Purchase completed"
        );

        Ok(entry)
    }
}

/// Rolls back and returns the business error that caused it.
async fn abort<T>(tx: Transaction<'static, Sqlite>, err: PurchaseError) -> PurchaseResult<T> {
    warn!(error = %err, ?err, "Purchase rejected");
    tx.rollback().await?;
    Err(err)
}

// =============================================================================
// Unit Tests
// =============================================================================
