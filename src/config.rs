// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is fetched once at startup and injected through `AppState`;
//! nothing reads the environment after boot.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name ("development", "production", ...)
    pub environment: String,
    /// Whether to set the `Secure` attribute on session cookies
    pub production: bool,
    /// Frontend origin for CORS and post-login redirects
    pub frontend_url: String,
    /// SQLite connection string
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Service name reported in startup logs
    pub service_name: String,
    /// Service version reported in startup logs
    pub service_version: String,

    /// Session cookie signing key (raw bytes)
    pub session_secret: Vec<u8>,

    // --- OAuth provider credentials (authentik) ---
    pub authentik_client_id: String,
    pub authentik_client_secret: String,
    pub authentik_redirect_url: String,
    pub authentik_auth_url: String,
    pub authentik_token_url: String,
    pub authentik_userinfo_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `SESSION_SECRET` is required outside development; in development a
    /// random per-process key is generated when it is absent. A missing
    /// secret outside development panics — it must never be survivable.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(key) => key.into_bytes(),
            Err(_) if environment == "development" => {
                tracing::warn!("SESSION_SECRET not set, generating a random development key");
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                STANDARD.encode(bytes).into_bytes()
            }
            Err(_) => panic!("SESSION_SECRET environment variable is required"),
        };

        Ok(Self {
            environment,
            production: env_bool("PRODUCTION", false),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://accounts.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "accounts-api".to_string()),
            service_version: env::var("SERVICE_VERSION").unwrap_or_else(|_| "dev".to_string()),
            session_secret,
            authentik_client_id: env::var("AUTHENTIK_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("AUTHENTIK_CLIENT_ID"))?,
            authentik_client_secret: env::var("AUTHENTIK_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("AUTHENTIK_CLIENT_SECRET"))?,
            authentik_redirect_url: env::var("AUTHENTIK_REDIRECT_URL")
                .map_err(|_| ConfigError::Missing("AUTHENTIK_REDIRECT_URL"))?,
            authentik_auth_url: env::var("AUTHENTIK_AUTH_URL")
                .map_err(|_| ConfigError::Missing("AUTHENTIK_AUTH_URL"))?,
            authentik_token_url: env::var("AUTHENTIK_TOKEN_URL")
                .map_err(|_| ConfigError::Missing("AUTHENTIK_TOKEN_URL"))?,
            authentik_userinfo_url: env::var("AUTHENTIK_USERINFO_URL")
                .map_err(|_| ConfigError::Missing("AUTHENTIK_USERINFO_URL"))?,
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            environment: "development".to_string(),
            production: false,
            frontend_url: "http://localhost:3000".to_string(),
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            service_name: "accounts-api".to_string(),
            service_version: "test".to_string(),
            session_secret: b"test_session_secret_32_bytes!!!!".to_vec(),
            authentik_client_id: "test_client_id".to_string(),
            authentik_client_secret: "test_client_secret".to_string(),
            authentik_redirect_url: "http://localhost:8080/auth/login/authentik/callback"
                .to_string(),
            authentik_auth_url: "http://localhost:9000/application/o/authorize/".to_string(),
            authentik_token_url: "http://localhost:9000/application/o/token/".to_string(),
            authentik_userinfo_url: "http://localhost:9000/application/o/userinfo/".to_string(),
        }
    }
}

/// Read a boolean environment variable ("true"/"false"), with default.
fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key).as_deref() {
        Ok("true") => true,
        Ok("false") => false,
        _ => default,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
