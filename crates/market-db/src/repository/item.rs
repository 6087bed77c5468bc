//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## Key Operations
//! - Substring search over title and category name
//! - CRUD operations
//!
//! ## Search Ranking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Item Search Works                                │
//! │                                                                         │
//! │  User types: "lamp"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Case-insensitive substring match on item title OR category name       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ items LEFT JOIN categories              │                           │
//! │  │                                         │                           │
//! │  │ 4 | Desk Lamp      | Furniture         │ ← title match  (rank 1)   │
//! │  │ 9 | Bulb           | Lamps & Lighting  │ ← category only (rank 2)  │
//! │  │ 2 | Oak Table      | Furniture         │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [Desk Lamp, Bulb]   (ties broken by id)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uncategorised items still match through their title.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{fold_case, row_exists};
use market_core::{Item, ItemChanges, ItemDetail, NewItem};

const ITEM_COLUMNS: &str = "id, title, description, price_cents, quantity, seller_id, category_id";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let results = repo.search("lamp", None).await?;
/// let item = repo.get_by_id(4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists every item, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the items one seller has listed.
    pub async fn list_by_seller(&self, seller_id: i64) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE seller_id = ?1 ORDER BY id"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item together with its seller's name (item details page).
    pub async fn get_detail(&self, id: i64) -> DbResult<Option<ItemDetail>> {
        let detail = sqlx::query_as::<_, ItemDetail>(
            r#"
            SELECT
                i.id,
                i.title,
                i.description,
                i.price_cents,
                i.quantity,
                i.seller_id,
                i.category_id,
                u.name AS seller_name
            FROM items i
            INNER JOIN users u ON u.id = i.seller_id
            WHERE i.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// Searches all items by title or category name.
    ///
    /// ## Arguments
    /// * `query` - Substring to look for, case-insensitive. Empty matches all.
    /// * `category_id` - Optional exact category filter
    pub async fn search(&self, query: &str, category_id: Option<i64>) -> DbResult<Vec<Item>> {
        self.search_scoped(None, query, category_id).await
    }

    /// Searches one seller's items. An empty query returns all of them.
    pub async fn search_by_seller(
        &self,
        seller_id: i64,
        query: &str,
        category_id: Option<i64>,
    ) -> DbResult<Vec<Item>> {
        self.search_scoped(Some(seller_id), query, category_id)
            .await
    }

    async fn search_scoped(
        &self,
        seller_id: Option<i64>,
        query: &str,
        category_id: Option<i64>,
    ) -> DbResult<Vec<Item>> {
        let query = query.trim();

        debug!(query = %query, ?category_id, ?seller_id, "Searching items");

        // Both sides are folded in Rust; instr() with an empty needle
        // returns 1, so "" matches every row
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT
                i.id,
                i.title,
                i.description,
                i.price_cents,
                i.quantity,
                i.seller_id,
                i.category_id
            FROM items i
            LEFT JOIN categories c ON c.category_id = i.category_id
            WHERE (
                    instr(i.title_folded, ?1) > 0
                    OR instr(COALESCE(c.name_folded, ''), ?1) > 0
                )
              AND (?2 IS NULL OR i.category_id = ?2)
              AND (?3 IS NULL OR i.seller_id = ?3)
            ORDER BY
                CASE WHEN instr(i.title_folded, ?1) > 0 THEN 1 ELSE 2 END,
                i.id
            "#,
        )
        .bind(fold_case(query))
        .bind(category_id)
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Search returned items");
        Ok(items)
    }

    /// Inserts a new listing.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored item with its new id
    /// * `Err(DbError::NotFound)` - Seller doesn't exist
    ///
    /// A `category_id` that names no category is stored as null.
    pub async fn create(&self, new: &NewItem) -> DbResult<Item> {
        debug!(title = %new.title, seller_id = new.seller_id, "Inserting item");

        if !row_exists(&self.pool, "users", "id", new.seller_id).await? {
            return Err(DbError::not_found("Seller", new.seller_id));
        }

        let category_id = self.resolve_category(new.category_id).await?;

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (title, title_folded, description, price_cents, quantity, seller_id, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(fold_case(&new.title))
        .bind(&new.description)
        .bind(new.price_cents)
        .bind(new.quantity)
        .bind(new.seller_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// ## Returns
    /// * `Ok(Item)` - Item after the update
    /// * `Err(DbError::NotFound)` - Item or new seller doesn't exist
    pub async fn update(&self, id: i64, changes: &ItemChanges) -> DbResult<Item> {
        debug!(id = id, "Updating item");

        if let Some(seller_id) = changes.seller_id {
            if !row_exists(&self.pool, "users", "id", seller_id).await? {
                return Err(DbError::not_found("Seller", seller_id));
            }
        }

        let category_id = self.resolve_category(changes.category_id).await?;

        // ?3 and ?8 say whether the nullable columns are being set at all,
        // since a set-to-null is a legitimate change
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET
                title = COALESCE(?1, title),
                title_folded = COALESCE(?2, title_folded),
                description = CASE WHEN ?3 THEN ?4 ELSE description END,
                price_cents = COALESCE(?5, price_cents),
                quantity = COALESCE(?6, quantity),
                seller_id = COALESCE(?7, seller_id),
                category_id = CASE WHEN ?8 THEN ?9 ELSE category_id END
            WHERE id = ?10
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(changes.title.as_deref().map(fold_case))
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.price_cents)
        .bind(changes.quantity)
        .bind(changes.seller_id)
        .bind(changes.category_id.is_some())
        .bind(category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes an item and, by cascade, its reviews.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Ledger entries reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts total items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Maps a category id that names no category to `None`.
    async fn resolve_category(&self, category_id: Option<i64>) -> DbResult<Option<i64>> {
        match category_id {
            Some(id) if row_exists(&self.pool, "categories", "category_id", id).await? => {
                Ok(Some(id))
            }
            Some(id) => {
                debug!(category_id = id, "Unknown category, storing null");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{item, memory_db, user};

    async fn category(db: &crate::Database, name: &str) -> i64 {
        db.categories().create(name).await.unwrap().category_id
    }

    #[tokio::test]
    async fn test_create_and_get_detail() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;

        let created = item(&db, seller.id, "Desk Lamp", 5000, 2).await;
        assert_eq!(created.quantity, 2);
        assert_eq!(created.category_id, None);

        let detail = db.items().get_detail(created.id).await.unwrap().unwrap();
        assert_eq!(detail.item, created);
        assert_eq!(detail.seller_name, "Sam");

        assert!(db.items().get_detail(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_requires_seller() {
        let db = memory_db().await;
        let err = db
            .items()
            .create(&NewItem {
                title: "Ghost".to_string(),
                description: None,
                price_cents: 100,
                quantity: 1,
                seller_id: 77,
                category_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Seller"));
    }

    #[tokio::test]
    async fn test_unknown_category_stored_as_null() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let furniture = category(&db, "Furniture").await;

        let repo = db.items();
        let known = repo
            .create(&NewItem {
                title: "Chair".to_string(),
                description: None,
                price_cents: 3000,
                quantity: 1,
                seller_id: seller.id,
                category_id: Some(furniture),
            })
            .await
            .unwrap();
        assert_eq!(known.category_id, Some(furniture));

        let unknown = repo
            .create(&NewItem {
                category_id: Some(4242),
                title: "Stool".to_string(),
                description: None,
                price_cents: 1000,
                quantity: 1,
                seller_id: seller.id,
            })
            .await
            .unwrap();
        assert_eq!(unknown.category_id, None);
    }

    #[tokio::test]
    async fn test_search_ranks_title_matches_first() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let lighting = category(&db, "Lamps & Lighting").await;

        let bulb = db
            .items()
            .create(&NewItem {
                title: "LED Bulb".to_string(),
                description: None,
                price_cents: 500,
                quantity: 10,
                seller_id: seller.id,
                category_id: Some(lighting),
            })
            .await
            .unwrap();
        let lamp = item(&db, seller.id, "Desk LAMP", 5000, 1).await;
        let _table = item(&db, seller.id, "Oak Table", 20000, 1).await;

        let results = db.items().search("lamp", None).await.unwrap();
        let ids: Vec<i64> = results.iter().map(|i| i.id).collect();
        // Uncategorised title match first, category-only match second
        assert_eq!(ids, vec![lamp.id, bulb.id]);

        let filtered = db.items().search("lamp", Some(lighting)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, bulb.id);

        assert_eq!(db.items().search("", None).await.unwrap().len(), 3);
        assert!(db.items().search("sofa", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_seller() {
        let db = memory_db().await;
        let sam = user(&db, "Sam").await;
        let kim = user(&db, "Kim").await;

        item(&db, sam.id, "Desk Lamp", 5000, 1).await;
        item(&db, sam.id, "Rug", 7000, 1).await;
        item(&db, kim.id, "Floor Lamp", 9000, 1).await;

        let all_sam = db.items().search_by_seller(sam.id, "", None).await.unwrap();
        assert_eq!(all_sam.len(), 2);

        let sam_lamps = db
            .items()
            .search_by_seller(sam.id, "lamp", None)
            .await
            .unwrap();
        assert_eq!(sam_lamps.len(), 1);
        assert_eq!(sam_lamps[0].title, "Desk Lamp");

        assert_eq!(db.items().list_by_seller(kim.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let patisserie = category(&db, "PÂTISSERIE").await;

        let tin = item(&db, seller.id, "Éclair Tin", 1500, 1).await;
        let hits = db.items().search("éclair", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, tin.id);
        assert_eq!(db.items().search("ÉCLAIR", None).await.unwrap().len(), 1);

        // Category-only match through the folded category name
        let whisk = item(&db, seller.id, "Whisk", 800, 1).await;
        db.items()
            .update(
                whisk.id,
                &ItemChanges {
                    category_id: Some(patisserie),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let hits = db.items().search("pâtis", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, whisk.id);

        // Renaming refreshes the search key
        db.items()
            .update(
                tin.id,
                &ItemChanges {
                    title: Some("Crème Brûlée Set".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(db.items().search("éclair", None).await.unwrap().is_empty());
        assert_eq!(db.items().search("BRÛLÉE", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let lamp = item(&db, seller.id, "Desk Lamp", 5000, 2).await;

        let described = db
            .items()
            .update(
                lamp.id,
                &ItemChanges {
                    description: Some(Some("Brass, 40cm".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(described.description.as_deref(), Some("Brass, 40cm"));

        // Leaving the field out keeps it
        let repriced = db
            .items()
            .update(
                lamp.id,
                &ItemChanges {
                    price_cents: Some(4000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(repriced.description.as_deref(), Some("Brass, 40cm"));

        let cleared = db
            .items()
            .update(
                lamp.id,
                &ItemChanges {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.price_cents, 4000);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let lamp = item(&db, seller.id, "Desk Lamp", 5000, 2).await;

        let updated = db
            .items()
            .update(
                lamp.id,
                &ItemChanges {
                    price_cents: Some(4500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 4500);
        assert_eq!(updated.title, "Desk Lamp");
        assert_eq!(updated.quantity, 2);

        let missing = db
            .items()
            .update(
                999,
                &ItemChanges {
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));

        let bad_seller = db
            .items()
            .update(
                lamp.id,
                &ItemChanges {
                    seller_id: Some(999),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad_seller, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let lamp = item(&db, seller.id, "Desk Lamp", 5000, 2).await;

        db.items().delete(lamp.id).await.unwrap();
        assert!(db.items().get_by_id(lamp.id).await.unwrap().is_none());
        assert_eq!(db.items().count().await.unwrap(), 0);

        assert!(matches!(
            db.items().delete(lamp.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
