//! Authentication request DTOs

use serde::Deserialize;

/// Query string of the OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
}
