// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! # Authentication Module
//!
//! Authentication and authorization for the Catalyst API.
//!
//! ## Login Flow
//!
//! 1. Browser hits `GET /auth/{provider}`; the provider exchange redirects
//!    to the provider's authorization endpoint with a signed anti-forgery
//!    state cookie
//! 2. Provider redirects back to `GET /auth/{provider}/callback`
//! 3. Server verifies the state, exchanges the code, normalizes the
//!    provider's profile, and resolves or registers the identity
//! 4. Token codec issues an HS256 bearer token; browser is redirected to
//!    the front-end with `?token=<token>`
//! 5. Subsequent requests carry `Authorization: Bearer <token>` and pass
//!    through the session gate
//!
//! ## Security
//!
//! - The anti-forgery state is HMAC-signed, expiring, and single-use
//! - Token defects (malformed, bad signature, expired) are externally
//!   indistinguishable
//! - Tokens are stateless; validity is signature plus expiry only

pub mod error;
pub mod identity;
pub mod middleware;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod token;

pub use error::AuthError;
pub use identity::{ExternalIdentity, Identity, ProviderLink, RequestIdentity};
pub use middleware::{authenticate, require_authenticated, CurrentIdentity};
pub use provider::{ProviderConfig, ProviderRegistry};
pub use session::StateSession;
pub use token::{TokenCodec, AUTH_SCOPE};
