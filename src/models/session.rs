// SPDX-License-Identifier: MIT

//! Typed session payloads.
//!
//! Both cookies carry a versioned JSON payload signed by
//! [`crate::session::SessionCodec`]. The version field lets a future
//! payload change reject stale cookies instead of misreading them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current session payload version.
pub const SESSION_VERSION: u8 = 1;

fn current_version() -> u8 {
    SESSION_VERSION
}

/// Long-lived identity session, carried in the `user_session` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "v", default = "current_version")]
    pub version: u8,
    /// Provider access token
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub provider: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// Whether the session has passed its expiry timestamp.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Transient login state, carried in the `oauth_session` cookie between
/// the login redirect and the callback. Single-use; the callback removes
/// the cookie after validating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    #[serde(rename = "v", default = "current_version")]
    pub version: u8,
    /// Anti-forgery state token (base64url of 32 random bytes)
    pub state: String,
    pub provider: String,
}
