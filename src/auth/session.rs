// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Anti-forgery state for the OAuth handshake.
//!
//! The state value generated when a handshake begins is stored client-side
//! in an HMAC-signed, expiring cookie bound to the user agent. Completing
//! the exchange requires the cookie's signature, expiry, provider and state
//! to all match the callback's query parameters; the cookie is cleared in
//! the same response, so the state is single-use. No in-process shared
//! structure is involved, which keeps the handshake free of cross-request
//! coordination.

use axum::http::{header, HeaderMap};
use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the pending handshake state.
pub const STATE_COOKIE: &str = "oauth_state";

/// A begun handshake must complete within this window.
const STATE_TTL_SECS: i64 = 600;

/// Signs and verifies the handshake state cookie.
#[derive(Clone)]
pub struct StateSession {
    secret: String,
}

impl StateSession {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Build the `Set-Cookie` header value persisting `state` for `provider`.
    pub fn issue(&self, provider: &str, state: &str) -> String {
        let value = self.seal_at(Utc::now(), provider, state);
        format!(
            "{STATE_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={STATE_TTL_SECS}"
        )
    }

    /// A `Set-Cookie` header value that removes the state cookie.
    pub fn clear(&self) -> String {
        format!("{STATE_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }

    /// Check the callback against the cookie: signature, expiry, provider
    /// and state must all match. Any defect is a handshake failure.
    pub fn verify(
        &self,
        headers: &HeaderMap,
        provider: &str,
        state: &str,
    ) -> Result<(), AuthError> {
        let value = cookie_value(headers, STATE_COOKIE)
            .ok_or_else(|| AuthError::ProviderExchangeFailed("missing state cookie".into()))?;
        self.open_at(Utc::now(), &value, provider, state)
    }

    fn seal_at(&self, now: DateTime<Utc>, provider: &str, state: &str) -> String {
        let expires = now.timestamp() + STATE_TTL_SECS;
        let payload = Base64UrlUnpadded::encode_string(
            format!("{provider}|{state}|{expires}").as_bytes(),
        );
        let sig = Base64UrlUnpadded::encode_string(&self.sign(&payload));
        format!("{payload}.{sig}")
    }

    fn open_at(
        &self,
        now: DateTime<Utc>,
        value: &str,
        provider: &str,
        state: &str,
    ) -> Result<(), AuthError> {
        let mismatch = || AuthError::ProviderExchangeFailed("state mismatch".into());

        let (payload, sig) = value.split_once('.').ok_or_else(mismatch)?;
        let sig = Base64UrlUnpadded::decode_vec(sig).map_err(|_| mismatch())?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig).map_err(|_| mismatch())?;

        let decoded = Base64UrlUnpadded::decode_vec(payload).map_err(|_| mismatch())?;
        let decoded = String::from_utf8(decoded).map_err(|_| mismatch())?;
        let mut parts = decoded.split('|');
        let (cookie_provider, cookie_state, expires) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(p), Some(s), Some(e), None) => (p, s, e),
                _ => return Err(mismatch()),
            };

        let expires: i64 = expires.parse().map_err(|_| mismatch())?;
        if now.timestamp() > expires {
            return Err(AuthError::ProviderExchangeFailed("state expired".into()));
        }
        if cookie_provider != provider || cookie_state != state {
            return Err(mismatch());
        }
        Ok(())
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length")
    }
}

/// Read a cookie value from the request's `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        if let Ok(parsed) = cookie::Cookie::parse(part.trim()) {
            if parsed.name() == name {
                return Some(parsed.value().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session() -> StateSession {
        StateSession::new("test-secret-key-for-testing-only")
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("{STATE_COOKIE}={value}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn sealed_state_verifies() {
        let session = session();
        let value = session.seal_at(Utc::now(), "github", "abc123");
        let headers = headers_with_cookie(&value);
        assert!(session.verify(&headers, "github", "abc123").is_ok());
    }

    #[test]
    fn mismatched_state_is_rejected() {
        let session = session();
        let value = session.seal_at(Utc::now(), "github", "abc123");
        let headers = headers_with_cookie(&value);
        assert!(session.verify(&headers, "github", "other").is_err());
    }

    #[test]
    fn wrong_provider_is_rejected() {
        let session = session();
        let value = session.seal_at(Utc::now(), "github", "abc123");
        let headers = headers_with_cookie(&value);
        assert!(session.verify(&headers, "gitlab", "abc123").is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let session = session();
        let value = session.seal_at(Utc::now(), "github", "abc123");
        let forged = session.seal_at(Utc::now(), "github", "forged");
        // Splice the forged payload onto the genuine signature.
        let payload = forged.split_once('.').unwrap().0;
        let sig = value.split_once('.').unwrap().1;
        let headers = headers_with_cookie(&format!("{payload}.{sig}"));
        assert!(session.verify(&headers, "github", "forged").is_err());
    }

    #[test]
    fn expired_state_is_rejected() {
        let session = session();
        let begun = Utc::now() - Duration::seconds(STATE_TTL_SECS + 5);
        let value = session.seal_at(begun, "github", "abc123");
        let err = session
            .open_at(Utc::now(), &value, "github", "abc123")
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderExchangeFailed(_)));
    }

    #[test]
    fn missing_cookie_is_rejected() {
        let session = session();
        assert!(session.verify(&HeaderMap::new(), "github", "abc123").is_err());
    }

    #[test]
    fn other_secret_cannot_mint_state() {
        let value = StateSession::new("attacker-secret").seal_at(Utc::now(), "github", "abc123");
        let headers = headers_with_cookie(&value);
        assert!(session().verify(&headers, "github", "abc123").is_err());
    }
}
