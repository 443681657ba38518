// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod session;
pub mod user;

pub use session::{OAuthState, SessionData, SESSION_VERSION};
pub use user::{NewUser, OAuthUserInfo, User};
