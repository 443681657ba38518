// SPDX-License-Identifier: MIT

//! OAuth authentication routes.
//!
//! Implements the authorization-code flow: login redirect with an
//! anti-forgery state token, callback validation, token exchange, user
//! upsert, and session issuance.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{OAuthState, SessionData, SESSION_VERSION};
use crate::services::ProviderConfig;
use crate::session::{OAUTH_SESSION_COOKIE, USER_SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/{provider}", get(login))
        .route("/auth/login/{provider}/callback", get(callback))
        .route("/auth/logout", post(logout))
        .route("/auth/user", get(current_user))
}

/// Generate the anti-forgery state token: 32 bytes of CSPRNG output,
/// base64url-encoded.
fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Start the OAuth flow: store {state, provider} in the transient cookie
/// and redirect to the provider's authorization endpoint.
async fn login(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let provider_config = ProviderConfig::lookup(&state.config, &provider)
        .ok_or_else(|| AppError::BadRequest(format!("unsupported provider: {provider}")))?;

    let oauth_state = generate_state();
    let payload = OAuthState {
        version: SESSION_VERSION,
        state: oauth_state.clone(),
        provider: provider.clone(),
    };
    let encoded = state
        .sessions
        .encode(&payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session write failed: {e}")))?;
    let jar = jar.add(state.sessions.cookie(OAUTH_SESSION_COOKIE, encoded));

    let auth_url = state.oauth.authorize_url(&provider_config, &oauth_state);

    tracing::info!(provider = %provider, "Starting OAuth flow, redirecting to provider");

    Ok((jar, Redirect::temporary(&auth_url)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// OAuth callback: validate state, exchange the code, upsert the user,
/// issue the identity session, and redirect to the frontend.
async fn callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let cookie = jar
        .get(OAUTH_SESSION_COOKIE)
        .ok_or_else(|| AppError::BadRequest("missing oauth session".to_string()))?;
    let oauth_state: OAuthState = state.sessions.decode(cookie.value()).map_err(|e| {
        tracing::warn!(error = %e, "Rejecting invalid oauth session cookie");
        AppError::BadRequest("invalid oauth session".to_string())
    })?;

    if oauth_state.provider != provider {
        return Err(AppError::BadRequest("invalid session provider".to_string()));
    }
    if params.state.as_deref() != Some(oauth_state.state.as_str()) {
        return Err(AppError::BadRequest("invalid state parameter".to_string()));
    }
    let code = params
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("code parameter is required".to_string()))?;

    let provider_config = ProviderConfig::lookup(&state.config, &provider)
        .ok_or_else(|| AppError::BadRequest(format!("unsupported provider: {provider}")))?;

    let token = state.oauth.exchange_code(&provider_config, code).await?;
    let user_info = state
        .oauth
        .fetch_user_info(&provider_config, &token.access_token)
        .await?;

    let user = match state.db.get_user_by_oauth(&provider, &user_info.id).await? {
        Some(user) => user,
        None => {
            // Signup and OAuth accounts sharing an email are not linked;
            // surface the collision before the unique constraint does.
            if let Some(existing) = state.db.get_user_by_email(&user_info.email).await? {
                tracing::warn!(
                    existing_user_id = existing.id,
                    provider = %provider,
                    "OAuth login email collides with an existing account, identities are not linked"
                );
            }
            state
                .db
                .insert_oauth_user(&user_info.email, &user_info.name, &provider, &user_info.id)
                .await?
        }
    };

    let now = Utc::now();
    let session = SessionData {
        version: SESSION_VERSION,
        token: token.access_token,
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        provider: provider.clone(),
        issued_at: now,
        expires_at: now + Duration::days(7),
    };
    let encoded = state
        .sessions
        .encode(&session)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session write failed: {e}")))?;

    // The transient state is single-use: drop it now that it is consumed.
    let jar = jar
        .add(state.sessions.cookie(USER_SESSION_COOKIE, encoded))
        .add(state.sessions.removal_cookie(OAUTH_SESSION_COOKIE));

    tracing::info!(
        user_id = user.id,
        provider = %provider,
        "OAuth login successful, session issued"
    );

    let redirect = format!("{}/auth/success", state.config.frontend_url);
    Ok((jar, Redirect::temporary(&redirect)))
}

/// Return the current session, or 401 when absent, malformed or expired.
async fn current_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<SessionData>> {
    let cookie = jar.get(USER_SESSION_COOKIE).ok_or(AppError::Unauthorized)?;

    let session: SessionData = state.sessions.decode(cookie.value()).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting user session cookie");
        AppError::Unauthorized
    })?;

    if session.is_expired(Utc::now()) {
        return Err(AppError::SessionExpired);
    }

    Ok(Json(session))
}

/// Clear the identity session. Idempotent; succeeds with or without a
/// session.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(state.sessions.removal_cookie(USER_SESSION_COOKIE));
    (
        jar,
        Json(serde_json::json!({ "message": "logout successful" })),
    )
}
