//! Identity provider boundary
//!
//! Sign-in is an OAuth authorization-code flow: the client is sent to
//! [`IdentityProvider::authorize_url`], comes back with a code, and the code is
//! exchanged for the provider's view of the user.

pub mod github;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use github::GithubIdentityProvider;

/// The provider's stable view of a signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable external user id
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Identity provider errors
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider refused the code (expired, reused, wrong client)
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is redirected to, carrying the anti-forgery `state`
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the signed-in identity
    async fn exchange_code(&self, code: &str) -> Result<Identity, IdentityError>;
}
