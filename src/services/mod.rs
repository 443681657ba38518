// SPDX-License-Identifier: MIT

//! Services module - provider configuration and the OAuth client.

pub mod oauth;
pub mod provider;

pub use oauth::{OAuthClient, TokenResponse};
pub use provider::ProviderConfig;
