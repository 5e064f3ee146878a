// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Authentication errors.
//!
//! Every variant is converted to a small JSON body at the HTTP boundary.
//! Token defects are deliberately undifferentiated: malformed, bad signature
//! and expired all surface as the same `invalid token` response, so the
//! error body cannot be used as an oracle for which check failed. Provider
//! and store failures keep their detail server-side; the caller only sees a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AuthError {
    /// Authorization header present but not `Bearer <token>`.
    InvalidAuthorization,
    /// Malformed token, bad signature, or expired. One outcome for all three.
    InvalidToken,
    /// Token verified but its subject is not a parseable identifier.
    InvalidSubject,
    /// Token subject did not resolve to a stored identity.
    UnknownAuthUser,
    /// Anonymous caller on a route that requires authentication.
    LoginRequired,
    /// OAuth handshake failed: provider unreachable, denied, or state mismatch.
    ProviderExchangeFailed(String),
    /// The persistence collaborator failed.
    IdentityStoreUnavailable(String),
    /// Unexpected internal failure (e.g. token signing).
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAuthorization
            | AuthError::InvalidToken
            | AuthError::InvalidSubject
            | AuthError::UnknownAuthUser
            | AuthError::LoginRequired => StatusCode::UNAUTHORIZED,
            AuthError::ProviderExchangeFailed(_)
            | AuthError::IdentityStoreUnavailable(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to callers. Internal failures are collapsed to a
    /// generic body; the detail only goes to the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthorization => "invalid authorization",
            AuthError::InvalidToken => "invalid token",
            AuthError::InvalidSubject => "invalid user id in token",
            AuthError::UnknownAuthUser => "unable to find auth user",
            AuthError::LoginRequired => "you must be logged in to access this route",
            AuthError::ProviderExchangeFailed(_)
            | AuthError::IdentityStoreUnavailable(_)
            | AuthError::Internal(_) => "internal server error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidAuthorization => write!(f, "invalid authorization header"),
            AuthError::InvalidToken => write!(f, "invalid token"),
            AuthError::InvalidSubject => write!(f, "invalid user id in token"),
            AuthError::UnknownAuthUser => write!(f, "unable to find auth user"),
            AuthError::LoginRequired => write!(f, "login required"),
            AuthError::ProviderExchangeFailed(msg) => write!(f, "provider exchange failed: {msg}"),
            AuthError::IdentityStoreUnavailable(msg) => {
                write!(f, "identity store unavailable: {msg}")
            }
            AuthError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::IdentityStoreUnavailable(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "authentication failure");
        }
        let body = Json(AuthErrorBody {
            error: self.public_message().to_string(),
        });
        (status, body).into_response()
    }
}
