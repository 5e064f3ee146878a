// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::identity::Identity;
use crate::auth::middleware::{authenticate, require_authenticated};
use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod users;

/// Build the application router.
///
/// The session gate wraps every route; `/v1` routes additionally reject
/// anonymous callers.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/users/me", get(users::current_user))
        .route(
            "/v1/users/{id}",
            get(users::user_detail)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_authenticated))
        .with_state(state.clone());

    let open = Router::new()
        .route("/auth/{provider}", get(auth::begin_or_complete))
        .route("/auth/{provider}/callback", get(auth::callback))
        .route("/auth/logout/{provider}", get(auth::logout))
        .route("/health", get(health::health))
        .with_state(state.clone());

    Router::new()
        .merge(open)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::begin_or_complete,
        auth::callback,
        auth::logout,
        users::current_user,
        users::user_detail,
        users::update_user,
        users::delete_user,
        health::health
    ),
    components(schemas(
        Identity,
        users::UserResponse,
        users::UpdateUserRequest,
        health::HealthResponse
    )),
    tags(
        (name = "Auth", description = "OAuth sign-in and logout"),
        (name = "Users", description = "User profile"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
