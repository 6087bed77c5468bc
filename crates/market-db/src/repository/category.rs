//! # Category Repository
//!
//! Categories are a flat list maintained by operators (see the `seed`
//! binary); the API only reads them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::fold_case;
use market_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name FROM categories ORDER BY category_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Categories whose name contains `name`, case-insensitive.
    pub async fn search(&self, name: &str) -> DbResult<Vec<Category>> {
        debug!(name = %name, "Searching categories");

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, category_name
            FROM categories
            WHERE instr(name_folded, ?1) > 0
            ORDER BY category_name
            "#,
        )
        .bind(fold_case(name))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn create(&self, name: &str) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (category_name, name_folded) VALUES (?1, ?2) RETURNING category_id, category_name",
        )
        .bind(name)
        .bind(fold_case(name))
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by exact name (used by the seeder to stay idempotent).
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name FROM categories WHERE category_name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{item, memory_db, user};
    use crate::DbError;

    #[tokio::test]
    async fn test_list_and_search() {
        let db = memory_db().await;
        let repo = db.categories();

        repo.create("Furniture").await.unwrap();
        repo.create("Electronics").await.unwrap();
        repo.create("Lamps & Lighting").await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        assert_eq!(names, vec!["Electronics", "Furniture", "Lamps & Lighting"]);

        let hits = repo.search("LIGHT").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category_name, "Lamps & Lighting");

        repo.create("Électroménager").await.unwrap();
        let hits = repo.search("électro").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category_name, "Électroménager");

        assert!(repo.get_by_name("Furniture").await.unwrap().is_some());
        assert!(repo.get_by_name("Toys").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = memory_db().await;
        db.categories().create("Books").await.unwrap();

        let err = db.categories().create("Books").await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_delete_category_nulls_items() {
        let db = memory_db().await;
        let seller = user(&db, "Sam").await;
        let books = db.categories().create("Books").await.unwrap();
        let novel = item(&db, seller.id, "Novel", 1200, 1).await;
        db.items()
            .update(
                novel.id,
                &market_core::ItemChanges {
                    category_id: Some(books.category_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        sqlx::query("DELETE FROM categories WHERE category_id = ?1")
            .bind(books.category_id)
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap();

        let novel = db.items().get_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(novel.category_id, None);
    }
}
