// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Bearer token issuance and verification.
//!
//! Tokens are compact JWTs signed with HS256 over a single shared secret.
//! They are stateless: validity is purely a function of signature and
//! expiry, with no server-side revocation. A token is valid through its
//! `exp` instant and rejected strictly after (no leeway); expiry uses the
//! same `Utc` clock as issuance.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthError;

/// Scope tag carried by tokens minted at login.
pub const AUTH_SCOPE: &str = "authentication";

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity identifier in string form.
    pub sub: String,
    pub email: String,
    pub scope: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expires at (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies bearer tokens against a single signing secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Issue a signed token for `identity_id`, expiring `ttl` from now.
    pub fn issue(
        &self,
        identity_id: Uuid,
        email: &str,
        scope: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.issue_at(Utc::now(), identity_id, email, scope, ttl)
    }

    fn issue_at(
        &self,
        now: DateTime<Utc>,
        identity_id: Uuid,
        email: &str,
        scope: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: identity_id.to_string(),
            email: email.to_string(),
            scope: scope.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// All defects (malformed, bad signature, expired) collapse to
    /// [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key-for-testing-only")
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let codec = codec();
        let id = Uuid::new_v4();
        let token = codec
            .issue(id, "ada@example.com", AUTH_SCOPE, Duration::hours(2))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.scope, AUTH_SCOPE);
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn expired_token_is_invalid_token() {
        let codec = codec();
        let issued = Utc::now() - Duration::hours(3);
        let token = codec
            .issue_at(issued, Uuid::new_v4(), "ada@example.com", AUTH_SCOPE, Duration::hours(2))
            .unwrap();

        assert!(matches!(codec.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let token = codec()
            .issue(Uuid::new_v4(), "ada@example.com", AUTH_SCOPE, Duration::hours(2))
            .unwrap();

        let other = TokenCodec::new("a-different-secret");
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_token_is_invalid_token() {
        let codec = codec();
        for garbage in ["", "not-a-jwt", "a.b", "a.b.c.d"] {
            assert!(
                matches!(codec.verify(garbage), Err(AuthError::InvalidToken)),
                "{garbage:?} should be rejected"
            );
        }
    }

    #[test]
    fn token_valid_until_its_expiry_instant() {
        let codec = codec();
        // exp only one second out; still valid now.
        let token = codec
            .issue(Uuid::new_v4(), "ada@example.com", AUTH_SCOPE, Duration::seconds(1))
            .unwrap();
        assert!(codec.verify(&token).is_ok());
    }
}
