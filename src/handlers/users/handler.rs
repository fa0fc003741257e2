//! User handler implementations

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppResult,
    handlers::submissions::response::UserSubmissionView,
    services::{SubmissionService, UserService},
    state::AppState,
};

use super::{
    request::UsernamePath,
    response::{BadgeResponse, PublicProfileResponse, UserStatsResponse},
};

/// Public profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> AppResult<Json<PublicProfileResponse>> {
    let user = UserService::get_by_username(state.store(), &path.username).await?;
    Ok(Json(user.into()))
}

/// A user's submissions, newest first
pub async fn list_user_submissions(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> AppResult<Json<Vec<UserSubmissionView>>> {
    let submissions = SubmissionService::list_for_username(state.store(), &path.username).await?;
    Ok(Json(submissions))
}

/// Profile statistics
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> AppResult<Json<UserStatsResponse>> {
    let stats = UserService::stats(state.store(), &path.username).await?;
    Ok(Json(stats))
}

/// Achievement badges
pub async fn get_user_badges(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> AppResult<Json<Vec<BadgeResponse>>> {
    let badges = UserService::badges(state.store(), &path.username).await?;
    Ok(Json(badges))
}
