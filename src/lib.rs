// SPDX-License-Identifier: MIT

//! Accounts API: user directory with OAuth2 login.
//!
//! This crate provides the backend for user CRUD plus OAuth2
//! authorization-code login with signed cookie sessions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use db::Database;
use services::OAuthClient;
use session::SessionCodec;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionCodec,
    pub oauth: OAuthClient,
}
