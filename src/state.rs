// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

use std::sync::Arc;

use chrono::Duration;

use crate::auth::provider::ProviderRegistry;
use crate::auth::session::StateSession;
use crate::auth::token::TokenCodec;
use crate::config::AppConfig;
use crate::store::IdentityStore;

/// Shared application state. Cheap to clone; every collaborator is behind
/// an `Arc` and thread-safe by contract.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdentityStore>,
    pub codec: Arc<TokenCodec>,
    pub providers: Arc<ProviderRegistry>,
    pub sessions: Arc<StateSession>,
    pub frontend_origin: String,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn IdentityStore>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            store,
            codec: Arc::new(TokenCodec::new(&config.token_secret)),
            providers: Arc::new(providers),
            sessions: Arc::new(StateSession::new(&config.token_secret)),
            frontend_origin: config.frontend_origin.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }
}
