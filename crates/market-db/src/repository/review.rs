//! # Review Repository
//!
//! Independent of purchases: any existing user may review any existing item.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use market_core::{ItemReview, NewReview, Review};

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT review_id, item_id, reviewer_id, review_date, comment, rating
            FROM reviews
            ORDER BY review_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Reviews of one item with reviewer names, newest first.
    pub async fn list_for_item(&self, item_id: i64) -> DbResult<Vec<ItemReview>> {
        let reviews = sqlx::query_as::<_, ItemReview>(
            r#"
            SELECT
                r.review_id,
                r.item_id,
                r.reviewer_id,
                r.review_date,
                r.comment,
                r.rating,
                u.name AS reviewer_name
            FROM reviews r
            INNER JOIN users u ON u.id = r.reviewer_id
            WHERE r.item_id = ?1
            ORDER BY r.review_date DESC, r.review_id DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Reviews written by one user, newest first.
    pub async fn list_by_reviewer(&self, reviewer_id: i64) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT review_id, item_id, reviewer_id, review_date, comment, rating
            FROM reviews
            WHERE reviewer_id = ?1
            ORDER BY review_date DESC, review_id DESC
            "#,
        )
        .bind(reviewer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Stores a review dated today (UTC).
    pub async fn create(&self, new: &NewReview) -> DbResult<Review> {
        self.create_on(new, Utc::now().date_naive()).await
    }

    /// Stores a review with an explicit date.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item or reviewer doesn't exist
    pub async fn create_on(&self, new: &NewReview, review_date: NaiveDate) -> DbResult<Review> {
        debug!(item_id = new.item_id, reviewer_id = new.reviewer_id, "Inserting review");

        if !row_exists(&self.pool, "items", "id", new.item_id).await? {
            return Err(DbError::not_found("Item", new.item_id));
        }
        if !row_exists(&self.pool, "users", "id", new.reviewer_id).await? {
            return Err(DbError::not_found("User", new.reviewer_id));
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (item_id, reviewer_id, review_date, comment, rating)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING review_id, item_id, reviewer_id, review_date, comment, rating
            "#,
        )
        .bind(new.item_id)
        .bind(new.reviewer_id)
        .bind(review_date)
        .bind(&new.comment)
        .bind(new.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Deletes a review.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such review
    pub async fn delete(&self, review_id: i64) -> DbResult<()> {
        debug!(review_id = review_id, "Deleting review");

        let result = sqlx::query("DELETE FROM reviews WHERE review_id = ?1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", review_id));
        }

        Ok(())
    }
}
