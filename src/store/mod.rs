// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Identity store seam.
//!
//! The persistence engine is an external collaborator reached through this
//! narrow trait. "Not found" is `Ok(None)`, never an error: a first-time
//! login is a normal outcome, and only genuine store failures travel on the
//! error channel.

pub mod memory;

pub use memory::InMemoryIdentityStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::identity::{ExternalIdentity, Identity};

/// A store failure. Distinct from "not found" by construction.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup and registration of identities and their provider links.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find the identity linked to `(provider, provider_user_id)`.
    async fn find_identity_id_by_provider_link(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<Uuid>, StoreError>;

    /// Find an identity by its identifier.
    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    /// Create an identity and its provider link as one unit.
    ///
    /// After a successful return a fully linked identity exists; on failure
    /// nothing is visible. If the link already exists, the existing
    /// identifier is returned and no new identity is created.
    async fn register_identity(&self, external: &ExternalIdentity) -> Result<Uuid, StoreError>;

    /// Replace a stored identity's profile fields. `Ok(None)` when no
    /// identity with that identifier exists.
    async fn update_identity(&self, identity: &Identity) -> Result<Option<Identity>, StoreError>;

    /// Remove an identity together with its provider links. `Ok(false)` when
    /// no identity with that identifier exists.
    async fn delete_identity(&self, id: Uuid) -> Result<bool, StoreError>;
}
