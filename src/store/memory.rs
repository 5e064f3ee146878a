// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! In-memory identity store.
//!
//! Backs the server and the tests. Both maps live behind a single lock, so
//! registration (identity + provider link) is atomic: no request ever
//! observes an identity without its link.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::identity::{ExternalIdentity, Identity, ProviderLink};

use super::{IdentityStore, StoreError};

#[derive(Default)]
struct Inner {
    identities: HashMap<Uuid, Identity>,
    // Keyed by (provider, provider_user_id); enforces link uniqueness.
    links: HashMap<(String, String), ProviderLink>,
}

#[derive(Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<Inner>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities. Test support.
    pub async fn identity_count(&self) -> usize {
        self.inner.read().await.identities.len()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_identity_id_by_provider_link(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<Uuid>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .links
            .get(&(provider.to_string(), provider_user_id.to_string()))
            .map(|link| link.identity_id))
    }

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.identities.get(&id).cloned())
    }

    async fn register_identity(&self, external: &ExternalIdentity) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;

        let key = (external.provider.clone(), external.provider_user_id.clone());
        if let Some(existing) = inner.links.get(&key) {
            return Ok(existing.identity_id);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: external.email.clone(),
            first_name: external.first_name.clone(),
            last_name: external.last_name.clone(),
            mobile_number: None,
        };
        let link = ProviderLink {
            id: Uuid::new_v4(),
            identity_id: identity.id,
            provider: external.provider.clone(),
            provider_user_id: external.provider_user_id.clone(),
            created_at: Utc::now(),
        };

        let id = identity.id;
        inner.identities.insert(id, identity);
        inner.links.insert(key, link);
        Ok(id)
    }

    async fn update_identity(&self, identity: &Identity) -> Result<Option<Identity>, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.identities.contains_key(&identity.id) {
            return Ok(None);
        }
        inner.identities.insert(identity.id, identity.clone());
        Ok(Some(identity.clone()))
    }

    async fn delete_identity(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.identities.remove(&id).is_none() {
            return Ok(false);
        }
        inner.links.retain(|_, link| link.identity_id != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_account(provider_user_id: &str) -> ExternalIdentity {
        ExternalIdentity {
            provider: "github".to_string(),
            provider_user_id: provider_user_id.to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn unknown_link_is_none_not_error() {
        let store = InMemoryIdentityStore::new();
        let found = store
            .find_identity_id_by_provider_link("github", "12345")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn register_creates_identity_and_link_together() {
        let store = InMemoryIdentityStore::new();
        let id = store.register_identity(&github_account("12345")).await.unwrap();

        let identity = store.find_identity_by_id(id).await.unwrap().unwrap();
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.first_name, "Ada");

        let linked = store
            .find_identity_id_by_provider_link("github", "12345")
            .await
            .unwrap();
        assert_eq!(linked, Some(id));
    }

    #[tokio::test]
    async fn duplicate_registration_returns_existing_identity() {
        let store = InMemoryIdentityStore::new();
        let first = store.register_identity(&github_account("12345")).await.unwrap();
        let second = store.register_identity(&github_account("12345")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.identity_count().await, 1);
    }

    #[tokio::test]
    async fn update_replaces_profile_fields() {
        let store = InMemoryIdentityStore::new();
        let id = store.register_identity(&github_account("12345")).await.unwrap();

        let mut identity = store.find_identity_by_id(id).await.unwrap().unwrap();
        identity.email = "countess@example.com".to_string();
        identity.mobile_number = Some("+44 20 7946 0000".to_string());

        let updated = store.update_identity(&identity).await.unwrap().unwrap();
        assert_eq!(updated.email, "countess@example.com");

        let stored = store.find_identity_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.email, "countess@example.com");
        assert_eq!(stored.mobile_number.as_deref(), Some("+44 20 7946 0000"));
    }

    #[tokio::test]
    async fn update_of_unknown_identity_is_none() {
        let store = InMemoryIdentityStore::new();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ghost@example.com".to_string(),
            first_name: "Ghost".to_string(),
            last_name: String::new(),
            mobile_number: None,
        };
        assert!(store.update_identity(&identity).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_identity_and_links() {
        let store = InMemoryIdentityStore::new();
        let id = store.register_identity(&github_account("12345")).await.unwrap();

        assert!(store.delete_identity(id).await.unwrap());
        assert!(store.find_identity_by_id(id).await.unwrap().is_none());
        assert!(store
            .find_identity_id_by_provider_link("github", "12345")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_identity_is_false() {
        let store = InMemoryIdentityStore::new();
        assert!(!store.delete_identity(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn same_user_id_on_other_provider_is_a_new_identity() {
        let store = InMemoryIdentityStore::new();
        let github = store.register_identity(&github_account("12345")).await.unwrap();

        let mut gitlab = github_account("12345");
        gitlab.provider = "gitlab".to_string();
        let other = store.register_identity(&gitlab).await.unwrap();

        assert_ne!(github, other);
        assert_eq!(store.identity_count().await, 2);
    }
}
