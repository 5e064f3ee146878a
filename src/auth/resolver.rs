// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Maps a canonical external identity to an internal identifier.

use uuid::Uuid;

use crate::store::IdentityStore;

use super::error::AuthError;
use super::identity::ExternalIdentity;

/// Find the identity linked to this external account, registering a new one
/// on first sight.
///
/// First-seen-wins: resolving the same external identity again returns the
/// identifier created the first time. An absent link is the normal
/// first-login outcome; only store failures propagate, as
/// [`AuthError::IdentityStoreUnavailable`].
pub async fn resolve_or_register(
    store: &dyn IdentityStore,
    external: &ExternalIdentity,
) -> Result<Uuid, AuthError> {
    if let Some(id) = store
        .find_identity_id_by_provider_link(&external.provider, &external.provider_user_id)
        .await?
    {
        return Ok(id);
    }

    let id = store.register_identity(external).await?;
    tracing::info!(provider = %external.provider, identity = %id, "registered new identity");
    Ok(id)
}
