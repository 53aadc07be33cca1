//! Password hashing
//!
//! New hashes use the configured scheme (bcrypt by default, matching the
//! hashes already in the user store). Verification reads the scheme from
//! the stored hash's prefix, so both kinds keep working side by side.
//!
//! # Performance Considerations
//!
//! Both schemes are intentionally CPU-intensive. Async callers should use
//! the `*_async` variants, which run on the blocking thread pool.

use crate::config::PasswordScheme;
use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    scheme: PasswordScheme,
    bcrypt_cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(PasswordScheme::Bcrypt, 10)
    }
}

impl PasswordService {
    pub fn new(scheme: PasswordScheme, bcrypt_cost: u32) -> Self {
        Self {
            scheme,
            bcrypt_cost,
        }
    }

    /// Hash a password with the configured scheme (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        match self.scheme {
            PasswordScheme::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e)),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only when the stored hash
    /// is unreadable.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if hash.starts_with("$argon2") {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        } else if hash.starts_with("$2") {
            bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
        } else {
            anyhow::bail!("Unrecognized password hash format")
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bcrypt_service() -> PasswordService {
        // minimum cost keeps the tests fast
        PasswordService::new(PasswordScheme::Bcrypt, 4)
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hash = bcrypt_service().hash("abcdef").unwrap();

        assert!(hash.starts_with("$2"));
        assert!(PasswordService::verify("abcdef", &hash).unwrap());
        assert!(!PasswordService::verify("abcdeg", &hash).unwrap());
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let service = PasswordService::new(PasswordScheme::Argon2, 4);
        let hash = service.hash("secure_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("secure_password_123", &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let service = bcrypt_service();
        let hash1 = service.hash("test_password").unwrap();
        let hash2 = service.hash("test_password").unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify("test_password", &hash1).unwrap());
        assert!(PasswordService::verify("test_password", &hash2).unwrap());
    }

    #[test]
    fn test_unknown_hash_format_is_error() {
        assert!(PasswordService::verify("abcdef", "abcdef").is_err());
        assert!(PasswordService::verify("abcdef", "").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = bcrypt_service().hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password, hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }
}
