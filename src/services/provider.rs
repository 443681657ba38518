// SPDX-License-Identifier: MIT

//! Identity provider registry.
//!
//! A static lookup by provider name. Exactly one provider ("authentik")
//! is wired up; an unknown name resolves to `None` and surfaces as a 400
//! at the HTTP layer.

use crate::config::Config;

/// Resolved endpoints and credentials for one identity provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl ProviderConfig {
    /// Look up a provider by name.
    pub fn lookup(config: &Config, provider: &str) -> Option<ProviderConfig> {
        match provider {
            "authentik" => Some(ProviderConfig {
                client_id: config.authentik_client_id.clone(),
                client_secret: config.authentik_client_secret.clone(),
                redirect_url: config.authentik_redirect_url.clone(),
                auth_url: config.authentik_auth_url.clone(),
                token_url: config.authentik_token_url.clone(),
                userinfo_url: config.authentik_userinfo_url.clone(),
            }),
            _ => None,
        }
    }
}
