// SPDX-License-Identifier: MIT

use accounts_api::config::Config;
use accounts_api::db::Database;
use accounts_api::routes::create_router;
use accounts_api::services::OAuthClient;
use accounts_api::session::SessionCodec;
use accounts_api::AppState;
use axum::response::Response;
use std::sync::Arc;

/// Create a test app with an in-memory database and test config.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default()).await
}

/// Create a test app with a custom config (stub provider URLs, etc).
#[allow(dead_code)]
pub async fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    let sessions = SessionCodec::new(&config.session_secret, config.production);

    let state = Arc::new(AppState {
        config,
        db,
        sessions,
        oauth: OAuthClient::new(),
    });

    (create_router(state.clone()), state)
}

/// All Set-Cookie header values of a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// Find the Set-Cookie header for a named cookie.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// The `name=value` pair of a Set-Cookie header, usable as a Cookie header.
#[allow(dead_code)]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("Set-Cookie has a name=value part")
        .to_string()
}
