// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! OAuth sign-in endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::auth::error::AuthError;
use crate::auth::resolver::resolve_or_register;
use crate::auth::token::AUTH_SCOPE;
use crate::state::AppState;

/// Query parameters the provider sends back when it redirects the browser
/// to us. Absent on the initial request that starts the handshake.
#[derive(Debug, Deserialize)]
pub struct HandshakeParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Start OAuth login, or complete it when the provider has already
/// redirected back here.
///
/// A completion on this route only proves the exchange worked: the fetched
/// profile is discarded and the browser is sent to the front-end origin.
/// Registration and token issuance live on `/auth/{provider}/callback`,
/// which is where the provider is configured to land; this route must not
/// grow into a second sign-in path.
#[utoipa::path(
    get,
    path = "/auth/{provider}",
    tag = "Auth",
    params(("provider" = String, Path, description = "OAuth provider name")),
    responses(
        (status = 307, description = "Redirect to the provider's login page, or to the front-end when the handshake is already complete"),
        (status = 500, description = "Provider exchange failed"),
    )
)]
pub async fn begin_or_complete(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<HandshakeParams>,
    headers: HeaderMap,
) -> Response {
    match (&params.code, &params.state) {
        (Some(code), Some(handshake_state)) => {
            match complete_exchange(&state, &provider, &headers, code, handshake_state).await {
                // Handshake done; the identity work happens on the callback
                // route. Send the browser home.
                Ok(_) => with_cleared_state(
                    &state,
                    Redirect::temporary(&state.frontend_origin).into_response(),
                ),
                Err(err) => err.into_response(),
            }
        }
        _ => begin(&state, &provider),
    }
}

/// Handle the provider's callback: complete the handshake, resolve or
/// register the identity, issue a bearer token, and hand the browser back
/// to the front-end.
#[utoipa::path(
    get,
    path = "/auth/{provider}/callback",
    tag = "Auth",
    params(("provider" = String, Path, description = "OAuth provider name")),
    responses(
        (status = 307, description = "Redirect to `{front-end}/callback?token=<token>`"),
        (status = 500, description = "Provider exchange, registration, or token issuance failed"),
    )
)]
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<HandshakeParams>,
    headers: HeaderMap,
) -> Response {
    match sign_in(&state, &provider, &params, &headers).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Clear the provider session state and send the browser home.
#[utoipa::path(
    get,
    path = "/auth/logout/{provider}",
    tag = "Auth",
    params(("provider" = String, Path, description = "OAuth provider name")),
    responses(
        (status = 307, description = "Redirect to /"),
        (status = 500, description = "Logout failed"),
    )
)]
pub async fn logout(State(state): State<AppState>, Path(provider): Path<String>) -> Response {
    if !state.providers.is_registered(&provider) {
        tracing::warn!(provider = %provider, "logout for unknown provider");
        return AuthError::ProviderExchangeFailed(format!("unknown provider: {provider}"))
            .into_response();
    }
    with_cleared_state(&state, Redirect::temporary("/").into_response())
}

fn begin(state: &AppState, provider: &str) -> Response {
    match state.providers.begin(provider) {
        Ok((auth_url, csrf_state)) => {
            let cookie = state.sessions.issue(provider, csrf_state.secret());
            ([(SET_COOKIE, cookie)], Redirect::temporary(auth_url.as_str())).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn sign_in(
    state: &AppState,
    provider: &str,
    params: &HandshakeParams,
    headers: &HeaderMap,
) -> Result<Response, AuthError> {
    let code = params
        .code
        .as_deref()
        .ok_or_else(|| AuthError::ProviderExchangeFailed("missing authorization code".into()))?;
    let handshake_state = params
        .state
        .as_deref()
        .ok_or_else(|| AuthError::ProviderExchangeFailed("missing state parameter".into()))?;

    let external = complete_exchange(state, provider, headers, code, handshake_state).await?;

    let identity_id = resolve_or_register(state.store.as_ref(), &external).await?;
    let token = state
        .codec
        .issue(identity_id, &external.email, AUTH_SCOPE, state.token_ttl)?;

    let redirect_url = format!(
        "{}/callback?token={token}",
        state.frontend_origin.trim_end_matches('/')
    );
    Ok(with_cleared_state(
        state,
        Redirect::temporary(&redirect_url).into_response(),
    ))
}

/// Verify the anti-forgery state against the signed cookie, then exchange
/// the code with the provider.
async fn complete_exchange(
    state: &AppState,
    provider: &str,
    headers: &HeaderMap,
    code: &str,
    handshake_state: &str,
) -> Result<crate::auth::identity::ExternalIdentity, AuthError> {
    state.sessions.verify(headers, provider, handshake_state)?;
    state.providers.complete(provider, code).await
}

/// Attach the cookie that removes the handshake state, making it single-use.
fn with_cleared_state(state: &AppState, response: Response) -> Response {
    ([(SET_COOKIE, state.sessions.clear())], response).into_response()
}
