//! Identity lookup used by the credential verifier and the gate

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// The fields of a user account that authentication needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Read access to identity records
///
/// Implemented for `PgPool` in the user repository.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Exact, case-sensitive lookup by email
    async fn find_identity_by_email(&self, email: &str) -> anyhow::Result<Option<IdentityRecord>>;

    async fn identity_exists(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Identity store held in memory
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    by_email: RwLock<HashMap<String, IdentityRecord>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: IdentityRecord) {
        self.by_email
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.email.clone(), record);
    }

    pub fn remove(&self, email: &str) -> Option<IdentityRecord> {
        self.by_email
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(email)
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_identity_by_email(&self, email: &str) -> anyhow::Result<Option<IdentityRecord>> {
        let records = self.by_email.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(email).cloned())
    }

    async fn identity_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        let records = self.by_email.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.values().any(|r| r.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = InMemoryIdentityStore::new();
        let id = Uuid::new_v4();
        store.insert(IdentityRecord {
            id,
            email: "a@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
        });

        let found = store.find_identity_by_email("a@example.com").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(id));
        assert!(store.find_identity_by_email("A@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identity_exists() {
        let store = InMemoryIdentityStore::new();
        let id = Uuid::new_v4();
        store.insert(IdentityRecord {
            id,
            email: "a@example.com".to_string(),
            password_hash: String::new(),
        });

        assert!(store.identity_exists(id).await.unwrap());
        store.remove("a@example.com");
        assert!(!store.identity_exists(id).await.unwrap());
    }
}
