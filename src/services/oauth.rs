// SPDX-License-Identifier: MIT

//! OAuth2 client for the authorization-code flow.
//!
//! Handles:
//! - Authorization redirect URL construction
//! - Code-for-token exchange against the provider's token endpoint
//! - User-info fetch with the access token as bearer credential
//!
//! Calls run inside the handler future, so a disconnected client cancels
//! any in-flight provider request.

use serde::Deserialize;

use crate::error::AppError;
use crate::models::OAuthUserInfo;
use crate::services::provider::ProviderConfig;

/// Scopes requested from the provider.
const SCOPES: &str = "openid profile email";

/// Token endpoint response. Only the access token is used; refresh is a
/// non-goal.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// OAuth2 HTTP client.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
}

impl Default for OAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Build the provider authorization URL with the anti-forgery state.
    pub fn authorize_url(&self, provider: &ProviderConfig, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            provider.auth_url,
            urlencoding::encode(&provider.client_id),
            urlencoding::encode(&provider.redirect_url),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        provider: &ProviderConfig,
        code: &str,
    ) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&provider.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", provider.redirect_url.as_str()),
                ("client_id", provider.client_id.as_str()),
                ("client_secret", provider.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Provider(format!(
                "token exchange failed with status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid token response: {e}")))
    }

    /// Fetch the user's identity from the provider's user-info endpoint.
    pub async fn fetch_user_info(
        &self,
        provider: &ProviderConfig,
        access_token: &str,
    ) -> Result<OAuthUserInfo, AppError> {
        let response = self
            .http
            .get(&provider.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("user info request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Provider(format!(
                "user info fetch failed with status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid user info response: {e}")))
    }
}
