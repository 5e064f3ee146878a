// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use catalyst_api::api::router;
use catalyst_api::auth::provider::{ProviderConfig, ProviderRegistry};
use catalyst_api::config::AppConfig;
use catalyst_api::state::AppState;
use catalyst_api::store::InMemoryIdentityStore;

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    // LOG_FORMAT=json emits JSON lines for log shippers; anything else keeps
    // the human-readable format.
    match env::var("LOG_FORMAT").ok().as_deref() {
        Some("json") => subscriber.json().init(),
        _ => subscriber.init(),
    }

    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Providers are registered once here and handed down through AppState;
    // no ambient global registration.
    let github = ProviderConfig::github(
        &config.github_client_id,
        &config.github_client_secret,
        &config.callback_base_url,
    )
    .expect("Failed to build GitHub provider configuration");
    let providers = ProviderRegistry::new().register("github", github);

    let store = Arc::new(InMemoryIdentityStore::new());
    let state = AppState::new(&config, store, providers);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("catalyst-api listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("HTTP server failed");
}
