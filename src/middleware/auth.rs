//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{
    db::{DocumentStore, repositories::UserRepository},
    error::{AppError, AppResult},
    models::User,
    services::{AuthService, Claims},
    state::AppState,
};

/// Authenticated user extracted from the session JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub claims: Claims,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            username: claims.username.clone(),
            is_admin: claims.is_admin,
            claims,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user wrapper (never fails)
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Reject the request unless it carries a valid, unrevoked session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let user = authenticate(&state, request.headers())
        .await
        .inspect_err(|e| debug!(path = %path, error = %e, "Authentication failed"))?;

    debug!(path = %path, user_id = %user.id, username = %user.username, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Attach the session user when a valid token is present; never rejects
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.headers().contains_key(AUTHORIZATION) {
        match authenticate(&state, request.headers()).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Ignoring invalid optional credentials"),
        }
    }

    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = AuthService::verify_token(token, &state.config().jwt.secret)?;

    if let Some(mut redis) = state.redis() {
        let revoked = AuthService::is_revoked(&mut redis, &claims.jti)
            .await
            .inspect_err(|e| warn!(error = %e, "Could not check session revocation"))?;
        if revoked {
            return Err(AppError::InvalidToken);
        }
    }

    Ok(claims.into())
}

/// Require a session whose stored user is a non-banned admin. The claim alone
/// is not trusted: a role revoked after sign-in takes effect immediately.
pub async fn require_admin(
    store: &dyn DocumentStore,
    auth_user: &AuthenticatedUser,
) -> AppResult<User> {
    let forbidden = || AppError::Forbidden("Admin access required".to_string());

    if !auth_user.is_admin {
        return Err(forbidden());
    }

    match UserRepository::find_by_id(store, &auth_user.id).await? {
        Some(user) if user.is_admin && !user.is_banned => Ok(user),
        _ => {
            warn!(user_id = %auth_user.id, "Admin claim no longer backed by the stored profile");
            Err(forbidden())
        }
    }
}
