// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! Catalyst API - Project Management Task Service
//!
//! Web API that generates project management tasks from diagrams. This
//! crate's core is the authentication subsystem: OAuth sign-in against
//! external identity providers, HS256 bearer tokens, and the per-request
//! session gate.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization
//! - `store` - Identity persistence seam
//! - `config` - Environment configuration
//! - `error` - Generic HTTP error responses
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
