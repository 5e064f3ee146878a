// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! The session gate: per-request authentication middleware.
//!
//! [`authenticate`] runs on every request before any handler. It binds a
//! [`RequestIdentity`] into the request extensions: `Anonymous` when no
//! `Authorization` header is present, `Authenticated` when a bearer token
//! verifies and its subject resolves to a stored identity. Whether
//! anonymity is acceptable is the downstream route's decision;
//! [`require_authenticated`] is the second gate for routes that reject
//! anonymous callers.
//!
//! A handler observing a request with no identity bound indicates the gate
//! was bypassed, which is a wiring defect, not a runtime condition; the
//! [`CurrentIdentity`] extractor treats it as fatal.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, VARY},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::state::AppState;

use super::error::AuthError;
use super::identity::RequestIdentity;

/// Establish the request identity and admit or reject the request.
///
/// Every response leaving the gate carries `Vary: Authorization`, so shared
/// caches never serve one caller's authenticated response to another.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut response = match establish_identity(&state, request.headers()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    };
    response
        .headers_mut()
        .append(VARY, HeaderValue::from_static("Authorization"));
    response
}

/// Reject anonymous callers. Composes after [`authenticate`] on protected
/// routes.
pub async fn require_authenticated(request: Request, next: Next) -> Response {
    let identity = request
        .extensions()
        .get::<RequestIdentity>()
        .expect("no identity bound to request: session gate must run before require_authenticated");

    if identity.is_anonymous() {
        return AuthError::LoginRequired.into_response();
    }
    next.run(request).await
}

/// The identity bound to the current request.
///
/// Panics if no identity is bound, which can only happen when the session
/// gate is not installed on the route: a programming defect that must not
/// be masked as an anonymous caller.
pub struct CurrentIdentity(pub RequestIdentity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .expect("no identity bound to request: session gate not installed");
        Ok(CurrentIdentity(identity))
    }
}

/// The gate's linear per-request decision: header absent means anonymous;
/// malformed header, bad token, bad subject, or unknown identity means
/// rejection; otherwise the resolved identity.
async fn establish_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RequestIdentity, AuthError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(RequestIdentity::Anonymous);
    };
    let header = header.to_str().map_err(|_| AuthError::InvalidAuthorization)?;

    let token = match header.split_once(' ') {
        Some(("Bearer", token)) if !token.contains(' ') => token,
        _ => return Err(AuthError::InvalidAuthorization),
    };

    let claims = state.codec.verify(token)?;

    let subject = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;

    match state.store.find_identity_by_id(subject).await {
        Ok(Some(identity)) => Ok(RequestIdentity::Authenticated(identity)),
        Ok(None) => Err(AuthError::UnknownAuthUser),
        Err(err) => {
            tracing::error!(error = %err, "identity lookup failed during authentication");
            Err(AuthError::UnknownAuthUser)
        }
    }
}
