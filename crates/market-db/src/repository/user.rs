//! # User Repository
//!
//! Local user rows. Identity lives with the external provider; the client
//! resolves the signed-in account through [`UserRepository::get_by_email`].
//!
//! ```text
//! Identity provider ──► verified email ──► GET /user/email/{email} ──► User
//! ```
//!
//! Email uniqueness is left to the UNIQUE index so two concurrent sign-ups
//! cannot both pass a check-then-insert.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use market_core::{NewUser, User, UserChanges};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, phone_number FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, phone_number FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by email, ignoring case.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, phone_number FROM users WHERE lower(email) = lower(?1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, new: &NewUser) -> DbResult<User> {
        debug!(email = %new.email, "Inserting user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone_number)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, email, phone_number
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    /// * `Err(DbError::UniqueViolation)` - New email belongs to someone else
    pub async fn update(&self, id: i64, changes: &UserChanges) -> DbResult<User> {
        debug!(id = id, "Updating user");

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE(?1, name),
                email = COALESCE(?2, email),
                phone_number = CASE WHEN ?3 THEN ?4 ELSE phone_number END
            WHERE id = ?5
            RETURNING id, name, email, phone_number
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(changes.phone_number.is_some())
        .bind(changes.phone_number.clone().flatten())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    /// * `Err(DbError::ForeignKeyViolation)` - User still sells items or
    ///   appears in the ledger
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{item, memory_db, user};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: Some("555-0100".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = memory_db().await;
        let repo = db.users();

        let ada = repo.create(&new_user("Ada", "ada@example.com")).await.unwrap();
        assert_eq!(ada.phone_number.as_deref(), Some("555-0100"));

        let by_id = repo.get_by_id(ada.id).await.unwrap().unwrap();
        assert_eq!(by_id, ada);

        let by_email = repo.get_by_email("ADA@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, ada.id);

        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = memory_db().await;
        let repo = db.users();

        repo.create(&new_user("Ada", "ada@example.com")).await.unwrap();
        let err = repo
            .create(&new_user("Imposter", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        // All-or-nothing: no second row
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let db = memory_db().await;
        let repo = db.users();
        let ada = repo.create(&new_user("Ada", "ada@example.com")).await.unwrap();
        repo.create(&new_user("Bob", "bob@example.com")).await.unwrap();

        let renamed = repo
            .update(
                ada.id,
                &UserChanges {
                    name: Some("Ada L.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Ada L.");
        assert_eq!(renamed.email, "ada@example.com");

        let clash = repo
            .update(
                ada.id,
                &UserChanges {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(clash.is_unique_violation());

        repo.update(
            ada.id,
            &UserChanges {
                phone_number: Some(Some("555-0100".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let cleared = repo
            .update(
                ada.id,
                &UserChanges {
                    phone_number: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.phone_number, None);
        assert_eq!(cleared.name, "Ada L.");

        let missing = repo.update(999, &UserChanges::default()).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_seller_with_items_is_restricted() {
        let db = memory_db().await;
        let sam = user(&db, "Sam").await;
        item(&db, sam.id, "Desk Lamp", 5000, 1).await;

        let err = db.users().delete(sam.id).await.unwrap_err();
        assert!(err.is_foreign_key_violation());

        let lone = user(&db, "Lone").await;
        db.users().delete(lone.id).await.unwrap();
        assert!(matches!(
            db.users().delete(lone.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
