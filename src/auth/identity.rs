// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Identity types used as authentication subjects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered user, as seen by the authentication subsystem.
///
/// The identifier is assigned exactly once, by the identity store, at
/// registration. This subsystem never mutates or deletes an identity after
/// creation; profile management lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Opaque, immutable identifier assigned by the store.
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

/// Association between an [`Identity`] and one external OAuth account.
///
/// The `(provider, provider_user_id)` pair is unique: at most one identity
/// per external account. Links are immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLink {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub provider: String,
    pub provider_user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Canonical external identity produced by a completed OAuth exchange.
///
/// Normalized from whatever shape the provider returns, so the resolver and
/// store never see provider-specific payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub provider: String,
    pub provider_user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// The identity bound to a request by the session gate.
///
/// Every request reaching a handler carries exactly one of these in its
/// extensions. "Is anonymous" is decided by the variant, never by comparing
/// field values against an empty record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// No authenticated caller.
    Anonymous,
    /// A verified bearer token resolved to this identity.
    Authenticated(Identity),
}

impl RequestIdentity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, RequestIdentity::Anonymous)
    }

    /// The authenticated identity, if any.
    pub fn authenticated(&self) -> Option<&Identity> {
        match self {
            RequestIdentity::Anonymous => None,
            RequestIdentity::Authenticated(identity) => Some(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            mobile_number: None,
        }
    }

    #[test]
    fn anonymous_is_anonymous() {
        assert!(RequestIdentity::Anonymous.is_anonymous());
        assert!(RequestIdentity::Anonymous.authenticated().is_none());
    }

    #[test]
    fn authenticated_is_not_anonymous() {
        let identity = sample_identity();
        let bound = RequestIdentity::Authenticated(identity.clone());
        assert!(!bound.is_anonymous());
        assert_eq!(bound.authenticated(), Some(&identity));
    }

    #[test]
    fn empty_record_is_not_anonymous() {
        // An all-empty identity is still an authenticated caller; anonymity
        // is a variant, not a value comparison.
        let bound = RequestIdentity::Authenticated(Identity {
            id: Uuid::nil(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            mobile_number: None,
        });
        assert!(!bound.is_anonymous());
    }
}
