// SPDX-License-Identifier: MIT

//! Signed cookie session store.
//!
//! Sessions are typed payloads (see [`crate::models::session`]) serialized
//! to JSON, HMAC-SHA256 signed, and carried in two cookies:
//! `oauth_session` (transient login state) and `user_session` (identity).
//! Wire format: `base64url(payload) "." base64url(tag)`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::models::SESSION_VERSION;

type HmacSha256 = Hmac<Sha256>;

/// Transient cookie holding {state, provider} across the OAuth roundtrip.
pub const OAUTH_SESSION_COOKIE: &str = "oauth_session";
/// Long-lived cookie holding the identity session.
pub const USER_SESSION_COOKIE: &str = "user_session";

/// Session cookie lifetime.
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// Errors from decoding a session cookie. All of these are treated as
/// "no valid session" by callers, never as server errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed session cookie")]
    Malformed,

    #[error("session cookie signature mismatch")]
    BadSignature,

    #[error("unsupported session payload version {0}")]
    UnsupportedVersion(u64),

    #[error("session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encodes, signs and verifies session cookie payloads.
#[derive(Clone)]
pub struct SessionCodec {
    mac: HmacSha256,
    secure: bool,
}

impl SessionCodec {
    /// Create a codec from the session secret. `secure` gates the `Secure`
    /// cookie attribute (set in production).
    pub fn new(secret: &[u8], secure: bool) -> Self {
        // HMAC-SHA256 accepts keys of any length
        let mac = HmacSha256::new_from_slice(secret).expect("HMAC key init");
        Self { mac, secure }
    }

    /// Serialize and sign a payload into a cookie value.
    pub fn encode<T: Serialize>(&self, payload: &T) -> Result<String, SessionError> {
        let json = serde_json::to_vec(payload)?;
        let tag = self.sign(&json);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&json),
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Verify and deserialize a cookie value.
    ///
    /// The signature is checked before the payload is parsed, and the
    /// payload's `v` field must match the supported version.
    pub fn decode<T: DeserializeOwned>(&self, value: &str) -> Result<T, SessionError> {
        let (payload_b64, tag_b64) = value.split_once('.').ok_or(SessionError::Malformed)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| SessionError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| SessionError::Malformed)?;

        let expected = self.sign(&json);
        if expected.ct_eq(&tag).unwrap_u8() != 1 {
            return Err(SessionError::BadSignature);
        }

        let raw: serde_json::Value =
            serde_json::from_slice(&json).map_err(|_| SessionError::Malformed)?;
        let version = raw.get("v").and_then(|v| v.as_u64()).unwrap_or(0);
        if version != u64::from(SESSION_VERSION) {
            return Err(SessionError::UnsupportedVersion(version));
        }

        serde_json::from_value(raw).map_err(|_| SessionError::Malformed)
    }

    /// Build a session cookie with the standard attributes
    /// (`Path=/`, `HttpOnly`, `SameSite=Lax`, 7-day max-age).
    pub fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(SESSION_MAX_AGE)
            .build()
    }

    /// Build a removal cookie: same attributes, empty value, `Max-Age=0`.
    pub fn removal_cookie(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::ZERO)
            .build()
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}
