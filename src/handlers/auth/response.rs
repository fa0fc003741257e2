//! Authentication response DTOs

use serde::Serialize;

/// Where to send the browser to start signing in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub authorize_url: String,
    pub state: String,
}

/// Signed-in user summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub photo_url: String,
    pub is_admin: bool,
    pub is_techtronica: bool,
}

/// Issued session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: SessionUser,
    /// False when the profile store was unavailable and the session was
    /// issued for the bare identity
    pub profile_resolved: bool,
}

/// Sign-out response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutResponse {
    pub message: String,
    pub revoked: bool,
}
