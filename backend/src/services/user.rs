//! User service for registration, login and account lookup
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on blocking thread pool
//! - Token service is passed by reference (pre-computed keys)

use crate::auth::{CredentialVerifier, IdentityStore, PasswordService, TokenService};
use crate::error::ApiError;
use crate::repositories::{is_unique_violation, CreateUser, UserRepository};
use devconnector_shared::validation::gravatar_url;
use devconnector_shared::{LoginRequest, RegisterRequest, User};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const USER_EXISTS_MESSAGE: &str = "User already exists";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and sign them in
    ///
    /// The request is expected to be validated already.
    pub async fn register(
        pool: &PgPool,
        passwords: &PasswordService,
        tokens: &TokenService,
        req: &RegisterRequest,
    ) -> Result<String, ApiError> {
        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::BadRequest(USER_EXISTS_MESSAGE.to_string()));
        }

        let avatar = gravatar_url(&req.email);

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = passwords
            .hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(
            pool,
            CreateUser {
                name: &req.name,
                email: &req.email,
                avatar: &avatar,
                password_hash: &password_hash,
            },
        )
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration
            if is_unique_violation(&e) {
                ApiError::BadRequest(USER_EXISTS_MESSAGE.to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = %user.id, "user registered");

        tokens.issue_default(user.id).map_err(ApiError::Internal)
    }

    /// Login with email and password, returning a fresh token
    pub async fn login<S>(
        store: &S,
        tokens: &TokenService,
        req: &LoginRequest,
    ) -> Result<String, ApiError>
    where
        S: IdentityStore + ?Sized,
    {
        let user_id = CredentialVerifier::verify(store, &req.email, &req.password).await?;

        tokens.issue_default(user_id).map_err(ApiError::Internal)
    }

    /// The authenticated user's public record
    pub async fn me(pool: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// All users, public view
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, ApiError> {
        let users = UserRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;

        Ok(users.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityRecord, InMemoryIdentityStore};
    use crate::error::INVALID_CREDENTIALS_MESSAGE;

    fn store_with(email: &str, password: &str) -> (InMemoryIdentityStore, Uuid) {
        let store = InMemoryIdentityStore::new();
        let id = Uuid::new_v4();
        let password_hash = bcrypt::hash(password, 4).unwrap();
        store.insert(IdentityRecord {
            id,
            email: email.to_string(),
            password_hash,
        });
        (store, id)
    }

    #[tokio::test]
    async fn test_login_returns_token_for_subject() {
        let (store, id) = store_with("a@example.com", "abcdef");
        let tokens = TokenService::new("user-service-secret", 3600);

        let req = LoginRequest {
            email: "a@example.com".to_string(),
            password: "abcdef".to_string(),
        };
        let token = UserService::login(&store, &tokens, &req).await.unwrap();

        assert_eq!(tokens.verify(&token).unwrap().subject_id, id);
    }

    #[tokio::test]
    async fn test_login_failure_is_invalid_credentials() {
        let (store, _) = store_with("a@example.com", "abcdef");
        let tokens = TokenService::new("user-service-secret", 3600);

        let req = LoginRequest {
            email: "a@example.com".to_string(),
            password: "wrong".to_string(),
        };
        let err = UserService::login(&store, &tokens, &req).await.unwrap_err();

        match err {
            ApiError::Unauthorized(msg) => assert_eq!(msg, INVALID_CREDENTIALS_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
