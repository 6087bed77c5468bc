//! # Ledger Repository
//!
//! Read-only view of the `transactions` table. Entries are appended by
//! [`PurchaseProcessor`](crate::purchase::PurchaseProcessor) and never
//! updated or deleted, so there is no write path here.
//!
//! Returned rows carry the title and price snapshotted at purchase time,
//! not the item's current values.

use sqlx::SqlitePool;

use crate::error::DbResult;
use market_core::{LedgerEntry, UserTransactions};

pub(crate) const LEDGER_COLUMNS: &str =
    "trans_id, item_id, buyer_id, seller_id, item_title, price_cents, date";

#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Every ledger entry in insertion order.
    pub async fn list(&self) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM transactions ORDER BY trans_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn get_by_id(&self, trans_id: i64) -> DbResult<Option<LedgerEntry>> {
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM transactions WHERE trans_id = ?1"
        ))
        .bind(trans_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// A user's purchases and sales, each newest first.
    pub async fn for_user(&self, user_id: i64) -> DbResult<UserTransactions> {
        let purchases = self.by_party("buyer_id", user_id).await?;
        let sales = self.by_party("seller_id", user_id).await?;

        Ok(UserTransactions { purchases, sales })
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn by_party(&self, column: &'static str, user_id: i64) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS}
            FROM transactions
            WHERE {column} = ?1
            ORDER BY date DESC, trans_id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
