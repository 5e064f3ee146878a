// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! OAuth authorization-code exchange against external identity providers.
//!
//! [`ProviderRegistry`] is built once at startup from the application
//! configuration and handed down by reference; there is no ambient global
//! provider state. Each registered provider carries its endpoints, scopes
//! and client credentials.
//!
//! Completing an exchange yields a canonical [`ExternalIdentity`]; callers
//! never see the provider's raw payloads.

use std::collections::HashMap;

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use url::Url;

use super::error::AuthError;
use super::identity::ExternalIdentity;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// GitHub user info from the REST API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    email: Option<String>,
    name: Option<String>,
}

/// GitHub email info from the REST API.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// One provider's endpoints, credentials and scopes.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// GitHub provider configuration. The callback lands on
    /// `{callback_base_url}/auth/github/callback`.
    pub fn github(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_base_url: &str,
    ) -> Result<Self, AuthError> {
        let bad_url =
            |e: url::ParseError| AuthError::Internal(format!("invalid provider URL: {e}"));

        Ok(Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            auth_url: AuthUrl::new("https://github.com/login/oauth/authorize".to_string())
                .map_err(bad_url)?,
            token_url: TokenUrl::new("https://github.com/login/oauth/access_token".to_string())
                .map_err(bad_url)?,
            redirect_url: RedirectUrl::new(format!(
                "{}/auth/github/callback",
                callback_base_url.trim_end_matches('/')
            ))
            .map_err(bad_url)?,
            scopes: vec!["user:email".to_string(), "read:user".to_string()],
        })
    }

    fn client(&self) -> ConfiguredClient {
        BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
    }
}

/// All providers this deployment can authenticate against.
///
/// Constructed during startup and shared through `AppState`.
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self { providers: HashMap::new() }
    }

    pub fn register(mut self, name: impl Into<String>, config: ProviderConfig) -> Self {
        self.providers.insert(name.into(), config);
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    fn get(&self, name: &str) -> Result<&ProviderConfig, AuthError> {
        self.providers
            .get(name)
            .ok_or_else(|| AuthError::ProviderExchangeFailed(format!("unknown provider: {name}")))
    }

    /// Start a handshake: the authorization URL to redirect the caller to,
    /// plus the freshly generated anti-forgery state.
    pub fn begin(&self, provider: &str) -> Result<(Url, CsrfToken), AuthError> {
        let config = self.get(provider)?;
        let client = config.client();

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (auth_url, csrf_state) = request.url();
        Ok((auth_url, csrf_state))
    }

    /// Complete a handshake: exchange the authorization code for an access
    /// token and normalize the provider's profile. The anti-forgery state
    /// must already have been checked by the caller.
    pub async fn complete(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<ExternalIdentity, AuthError> {
        let config = self.get(provider)?;

        // The exchange client must not follow redirects.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;

        let token = config
            .client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| AuthError::ProviderExchangeFailed(format!("token exchange failed: {e}")))?;

        match provider {
            "github" => fetch_github_identity(token.access_token().secret()).await,
            other => Err(AuthError::ProviderExchangeFailed(format!(
                "no profile fetcher for provider: {other}"
            ))),
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch and normalize the GitHub profile for an access token.
///
/// GitHub hides the email on `/user` when the user marks it private; the
/// `/user/emails` endpoint (covered by the `user:email` scope) supplies the
/// primary verified address in that case.
async fn fetch_github_identity(access_token: &str) -> Result<ExternalIdentity, AuthError> {
    let fetch_failed =
        |e: reqwest::Error| AuthError::ProviderExchangeFailed(format!("profile fetch failed: {e}"));

    let client = reqwest::Client::new();
    let user: GitHubUser = client
        .get("https://api.github.com/user")
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, "catalyst-api")
        .send()
        .await
        .map_err(fetch_failed)?
        .json()
        .await
        .map_err(fetch_failed)?;

    let email = match user.email {
        Some(email) => email,
        None => {
            let emails: Vec<GitHubEmail> = client
                .get("https://api.github.com/user/emails")
                .bearer_auth(access_token)
                .header(reqwest::header::USER_AGENT, "catalyst-api")
                .send()
                .await
                .map_err(fetch_failed)?
                .json()
                .await
                .map_err(fetch_failed)?;

            emails
                .into_iter()
                .find(|e| e.primary && e.verified)
                .map(|e| e.email)
                .ok_or_else(|| {
                    AuthError::ProviderExchangeFailed("no verified email on account".into())
                })?
        }
    };

    let (first_name, last_name) = split_display_name(user.name.as_deref(), &user.login);

    Ok(ExternalIdentity {
        provider: "github".to_string(),
        provider_user_id: user.id.to_string(),
        email,
        first_name,
        last_name,
    })
}

/// Split a display name into first/last. Falls back to the login when the
/// profile has no name set.
fn split_display_name(name: Option<&str>, login: &str) -> (String, String) {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => match name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
            None => (name.to_string(), String::new()),
        },
        None => (login.to_string(), String::new()),
    }
}
