//! Login-time credential verification

use super::error::AuthError;
use super::password::PasswordService;
use super::store::IdentityStore;
use tracing::debug;
use uuid::Uuid;

/// Checks an email/password pair against the identity store
pub struct CredentialVerifier;

impl CredentialVerifier {
    /// Return the identity's id if `password` matches the stored hash for `email`
    ///
    /// An unknown email and a wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn verify<S>(store: &S, email: &str, password: &str) -> Result<Uuid, AuthError>
    where
        S: IdentityStore + ?Sized,
    {
        let record = store
            .find_identity_by_email(email)
            .await
            .map_err(AuthError::PersistenceUnavailable)?;

        let Some(record) = record else {
            debug!("login rejected: unknown identity");
            return Err(AuthError::InvalidCredentials);
        };

        // CPU-intensive; runs on the blocking pool
        let valid = PasswordService::verify_async(password.to_string(), record.password_hash)
            .await
            .map_err(AuthError::Internal)?;

        if !valid {
            debug!(user_id = %record.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{IdentityRecord, InMemoryIdentityStore};
    use crate::config::PasswordScheme;
    use async_trait::async_trait;

    fn store_with(email: &str, password: &str) -> (InMemoryIdentityStore, Uuid) {
        let store = InMemoryIdentityStore::new();
        let id = Uuid::new_v4();
        let password_hash = PasswordService::new(PasswordScheme::Bcrypt, 4)
            .hash(password)
            .unwrap();
        store.insert(IdentityRecord {
            id,
            email: email.to_string(),
            password_hash,
        });
        (store, id)
    }

    struct UnavailableStore;

    #[async_trait]
    impl IdentityStore for UnavailableStore {
        async fn find_identity_by_email(&self, _: &str) -> anyhow::Result<Option<IdentityRecord>> {
            anyhow::bail!("connection refused")
        }

        async fn identity_exists(&self, _: Uuid) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_correct_password_returns_id() {
        let (store, id) = store_with("a@example.com", "abcdef");
        let verified = CredentialVerifier::verify(&store, "a@example.com", "abcdef")
            .await
            .unwrap();
        assert_eq!(verified, id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let (store, _) = store_with("a@example.com", "abcdef");

        let unknown = CredentialVerifier::verify(&store, "nobody@example.com", "abcdef")
            .await
            .unwrap_err();
        let wrong = CredentialVerifier::verify(&store, "a@example.com", "abcdeg")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let (store, _) = store_with("a@example.com", "abcdef");
        let result = CredentialVerifier::verify(&store, "A@example.com", "abcdef").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_unavailable() {
        let result = CredentialVerifier::verify(&UnavailableStore, "a@example.com", "abcdef").await;
        assert!(matches!(result, Err(AuthError::PersistenceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_internal() {
        let store = InMemoryIdentityStore::new();
        store.insert(IdentityRecord {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: "plaintext".to_string(),
        });

        let result = CredentialVerifier::verify(&store, "a@example.com", "plaintext").await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
