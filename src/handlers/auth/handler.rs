//! Authentication handler implementations

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{AuthService, Claims},
    state::AppState,
};

use super::{
    request::OAuthCallbackQuery,
    response::{SessionResponse, SignInResponse, SignOutResponse},
};

/// Start GitHub sign-in
pub async fn begin_github_sign_in(
    State(state): State<AppState>,
) -> AppResult<Json<SignInResponse>> {
    let started = AuthService::begin_sign_in(state.identity(), state.config())?;
    Ok(Json(started))
}

/// OAuth callback: exchange the code and issue a session
pub async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> AppResult<Json<SessionResponse>> {
    let session = AuthService::complete_sign_in(
        state.store(),
        state.identity(),
        state.config(),
        &query.code,
        &query.state,
    )
    .await?;

    Ok(Json(session))
}

/// Claims of the current session
pub async fn get_current_session(auth_user: AuthenticatedUser) -> Json<Claims> {
    Json(auth_user.claims)
}

/// Sign out (revoke the current session)
pub async fn sign_out(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<SignOutResponse>> {
    let revoked = AuthService::sign_out(state.redis(), &auth_user.claims).await?;

    Ok(Json(SignOutResponse {
        message: "Signed out successfully".to_string(),
        revoked,
    }))
}
