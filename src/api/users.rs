// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Catalyst

//! User endpoints: the current caller's profile plus profile CRUD by id.
//! All routes here sit behind the authentication requirement.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::identity::Identity;
use crate::auth::middleware::CurrentIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// A user profile as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            mobile_number: identity.mobile_number,
        }
    }
}

/// Profile update payload. Email and names are required; the mobile number
/// may be omitted or cleared.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: Option<String>,
}

impl UpdateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty()
            || self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
        {
            return Err(ApiError::bad_request("Invalid Request Sent"));
        }
        Ok(())
    }
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user's profile", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn current_user(
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<UserResponse>, AuthError> {
    let identity = identity.authenticated().ok_or(AuthError::LoginRequired)?;
    Ok(Json(identity.clone().into()))
}

/// Get a user's profile by id.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The user's profile", body = UserResponse),
        (status = 400, description = "Malformed user id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn user_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid User ID"))?;
    let identity = state
        .store
        .find_identity_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not Found"))?;
    Ok(Json(identity.into()))
}

/// Update a user's email, names and mobile number.
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    security(("bearer" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The updated profile", body = UserResponse),
        (status = 400, description = "Malformed id or payload"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid Request Sent"))?;
    payload.validate()?;

    let mut identity = state
        .store
        .find_identity_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not Found"))?;

    identity.email = payload.email;
    identity.first_name = payload.first_name;
    identity.last_name = payload.last_name;
    identity.mobile_number = payload.mobile_number;

    let updated = state
        .store
        .update_identity(&identity)
        .await?
        .ok_or_else(|| ApiError::not_found("Not Found"))?;
    Ok(Json(updated.into()))
}

/// Delete a user by id.
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed user id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid User ID"))?;
    if !state.store.delete_identity(id).await? {
        return Err(ApiError::not_found("Not Found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_carries_profile_fields() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            mobile_number: Some("+44 20 7946 0000".to_string()),
        };

        let response: UserResponse = identity.clone().into();
        assert_eq!(response.id, identity.id);
        assert_eq!(response.email, "ada@example.com");
        assert_eq!(response.mobile_number, identity.mobile_number);
    }

    #[test]
    fn update_payload_requires_email_and_names() {
        let payload = UpdateUserRequest {
            email: " ".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            mobile_number: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid Request Sent");

        let payload = UpdateUserRequest {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            mobile_number: None,
        };
        assert!(payload.validate().is_ok());
    }
}
