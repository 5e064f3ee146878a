// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup; a local `.env`
//! file is honored when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `GITHUB_CLIENT_ID` | GitHub OAuth app client id | Required |
//! | `GITHUB_CLIENT_SECRET` | GitHub OAuth app client secret | Required |
//! | `CALLBACK_BASE_URL` | Public base URL for OAuth callbacks | `http://localhost:8080` |
//! | `TOKEN_SECRET` | HS256 signing secret (tokens and state cookie) | Required |
//! | `TOKEN_TTL_HOURS` | Bearer token lifetime in hours | `2` |
//! | `FRONTEND_ORIGIN` | Front-end origin for post-login redirects | `http://localhost:4200` |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `LOG_FORMAT` | `json` for JSON-lines log output | human-readable |

use std::env;

/// Application configuration, read once during startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub callback_base_url: String,
    pub token_secret: String,
    pub token_ttl_hours: i64,
    pub frontend_origin: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 8080),
            github_client_id: required("GITHUB_CLIENT_ID")?,
            github_client_secret: required("GITHUB_CLIENT_SECRET")?,
            callback_base_url: env_or("CALLBACK_BASE_URL", "http://localhost:8080"),
            token_secret: required("TOKEN_SECRET")?,
            token_ttl_hours: env_parse_or("TOKEN_TTL_HOURS", 2),
            frontend_origin: env_or("FRONTEND_ORIGIN", "http://localhost:4200"),
        })
    }
}

fn required(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("{key} must be set"))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_to_default() {
        assert_eq!(env_or("CATALYST_TEST_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn env_parse_or_falls_back_on_unset_or_garbage() {
        assert_eq!(env_parse_or("CATALYST_TEST_UNSET_PORT", 8080u16), 8080);

        env::set_var("CATALYST_TEST_GARBAGE_PORT", "not-a-port");
        assert_eq!(env_parse_or("CATALYST_TEST_GARBAGE_PORT", 8080u16), 8080);
        env::remove_var("CATALYST_TEST_GARBAGE_PORT");
    }

    #[test]
    fn required_reports_the_missing_key() {
        let err = required("CATALYST_TEST_MISSING_SECRET").unwrap_err();
        assert_eq!(err, "CATALYST_TEST_MISSING_SECRET must be set");
    }
}
