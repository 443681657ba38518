// SPDX-License-Identifier: MIT

//! OAuth callback tests.
//!
//! State/provider/code validation runs against the real router; the
//! happy path exchanges the code against a stub identity provider bound
//! to an ephemeral local port.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceExt;

use accounts_api::config::Config;
use accounts_api::session::{OAUTH_SESSION_COOKIE, USER_SESSION_COOKIE};

mod common;

/// Serve a stub identity provider; returns its base URL.
async fn spawn_stub_provider() -> String {
    let app = Router::new()
        .route(
            "/token",
            post(|| async {
                Json(serde_json::json!({
                    "access_token": "stub-access-token",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                }))
            }),
        )
        .route(
            "/broken-token",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "exchange refused") }),
        )
        .route(
            "/userinfo",
            get(|| async {
                Json(serde_json::json!({
                    "sub": "ext-123",
                    "email": "oauth@example.com",
                    "name": "OAuth User",
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Test config whose token/userinfo endpoints point at the stub.
fn stub_config(base: &str) -> Config {
    let mut config = Config::test_default();
    config.authentik_token_url = format!("{base}/token");
    config.authentik_userinfo_url = format!("{base}/userinfo");
    config
}

/// Run the login redirect, returning the transient cookie (as a Cookie
/// header value) and the state token from the redirect URL.
async fn start_login(app: &axum::Router) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/login/authentik")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let state = location
        .split("state=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap()
        .to_string();

    let cookies = common::set_cookie_headers(&response);
    let cookie = common::cookie_pair(&common::find_cookie(&cookies, OAUTH_SESSION_COOKIE));

    (cookie, state)
}

#[tokio::test]
async fn test_callback_success_issues_session_and_redirects() {
    let base = spawn_stub_provider().await;
    let (app, state) = common::create_test_app_with_config(stub_config(&base)).await;
    let (cookie, oauth_state) = start_login(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/auth/login/authentik/callback?state={oauth_state}&code=test-code"
                ))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost:3000/auth/success"
    );

    let cookies = common::set_cookie_headers(&response);
    let session_cookie = common::find_cookie(&cookies, USER_SESSION_COOKIE);
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("SameSite=Lax"));

    // The transient cookie is single-use and must be dropped
    let spent = common::find_cookie(&cookies, OAUTH_SESSION_COOKIE);
    assert!(spent.contains("Max-Age=0"));

    // The user record was created from the provider's user info
    let user = state
        .db
        .get_user_by_oauth("authentik", "ext-123")
        .await
        .unwrap()
        .expect("OAuth user inserted");
    assert_eq!(user.email, "oauth@example.com");
    assert_eq!(user.name, "OAuth User");

    // The session is immediately usable
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/user")
                .header(header::COOKIE, common::cookie_pair(&session_cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let session: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(session["email"], "oauth@example.com");
    assert_eq!(session["name"], "OAuth User");
    assert_eq!(session["provider"], "authentik");
    assert_eq!(session["user_id"], user.id);
}

#[tokio::test]
async fn test_callback_reuses_existing_oauth_user() {
    let base = spawn_stub_provider().await;
    let (app, state) = common::create_test_app_with_config(stub_config(&base)).await;

    for _ in 0..2 {
        let (cookie, oauth_state) = start_login(&app).await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/auth/login/authentik/callback?state={oauth_state}&code=test-code"
                    ))
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // Two logins, one record
    assert_eq!(state.db.get_all_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_callback_wrong_state_is_400() {
    let (app, _) = common::create_test_app().await;
    let (cookie, _) = start_login(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login/authentik/callback?state=wrong-state&code=test-code")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_without_session_is_400() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login/authentik/callback?state=whatever&code=test-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_provider_mismatch_is_400() {
    let (app, _) = common::create_test_app().await;
    let (cookie, oauth_state) = start_login(&app).await;

    // Transient session was issued for authentik
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/auth/login/github/callback?state={oauth_state}&code=test-code"
                ))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_missing_code_is_400() {
    let (app, _) = common::create_test_app().await;
    let (cookie, oauth_state) = start_login(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/auth/login/authentik/callback?state={oauth_state}"))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_tampered_session_cookie_is_400() {
    let (app, _) = common::create_test_app().await;
    let (cookie, oauth_state) = start_login(&app).await;

    // Corrupt the signed value
    let tampered = format!("{cookie}x");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/auth/login/authentik/callback?state={oauth_state}&code=test-code"
                ))
                .header(header::COOKIE, tampered)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_failed_exchange_is_500_and_no_session() {
    let base = spawn_stub_provider().await;
    let mut config = stub_config(&base);
    config.authentik_token_url = format!("{base}/broken-token");

    let (app, state) = common::create_test_app_with_config(config).await;
    let (cookie, oauth_state) = start_login(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/auth/login/authentik/callback?state={oauth_state}&code=test-code"
                ))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // No partial session is written
    let cookies = common::set_cookie_headers(&response);
    assert!(!cookies
        .iter()
        .any(|value| value.starts_with(&format!("{USER_SESSION_COOKIE}="))));
    assert!(state.db.get_all_users().await.unwrap().is_empty());
}
