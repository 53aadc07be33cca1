//! User repository for database operations

use crate::auth::{IdentityRecord, IdentityStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devconnector_shared::User;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// The public view drops the password hash
impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            name: record.name,
            email: record.email,
            avatar: record.avatar,
            date: record.created_at,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub avatar: &'a str,
    pub password_hash: &'a str,
}

/// True when the error is a Postgres unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, input: CreateUser<'_>) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, avatar, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, avatar, created_at
            "#,
        )
        .bind(input.name)
        .bind(input.email)
        .bind(input.avatar)
        .bind(input.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (exact match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// List all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if a user id exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Delete the user's posts, profile and account in one transaction
    ///
    /// Returns false when the user did not exist.
    pub async fn delete_account(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl IdentityStore for PgPool {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<IdentityRecord>> {
        let record = UserRepository::find_by_email(self, email).await?;

        Ok(record.map(|user| IdentityRecord {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
        }))
    }

    async fn identity_exists(&self, id: Uuid) -> Result<bool> {
        UserRepository::exists(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_has_no_hash() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            avatar: "https://www.gravatar.com/avatar/x".to_string(),
            created_at: Utc::now(),
        };

        let user: User = record.clone().into();
        let json = serde_json::to_string(&user).unwrap();

        assert_eq!(user.id, record.id);
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        let err = anyhow::Error::new(sqlx::Error::RowNotFound);
        assert!(!is_unique_violation(&err));
        assert!(!is_unique_violation(&anyhow::anyhow!("boom")));
    }
}
