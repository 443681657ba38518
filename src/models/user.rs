// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User record stored in the `users` table.
///
/// Created either by direct signup (`POST /users`, password set) or by
/// first OAuth login (provider + external ID set). The two creation paths
/// are not reconciled; see the email-collision warning in the callback.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Database-generated ID
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password for signup accounts, absent for OAuth accounts
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    /// OAuth provider name ("authentik"), absent for signup accounts
    pub oauth_provider: Option<String>,
    /// External subject ID at the provider
    pub oauth_id: Option<String>,
}

/// Request body for `POST /users` / `PUT /users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// User info returned by the provider's user-info endpoint.
///
/// Transient; used to look up or create a [`User`], never stored as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthUserInfo {
    /// External subject ID
    #[serde(rename = "sub")]
    pub id: String,
    pub email: String,
    pub name: String,
}
