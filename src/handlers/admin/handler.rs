//! Admin handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::submissions::response::PendingSubmissionView,
    middleware::auth::{AuthenticatedUser, require_admin},
    models::{Problem, User},
    services::{AdminService, ProblemService, ReviewOutcome, ReviewService, SubmissionService},
    state::AppState,
};

use super::{
    request::{
        ApproveSubmissionRequest, ProblemRequest, RejectSubmissionRequest, UpdateUserRoleRequest,
    },
    response::{AdminStatsResponse, AdminUsersListResponse, RebuildResponse},
};

/// Dashboard totals
pub async fn get_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<AdminStatsResponse>> {
    require_admin(state.store(), &auth_user).await?;

    let stats = AdminService::stats(state.store()).await?;
    Ok(Json(stats))
}

/// Every scheduled problem
pub async fn list_problems(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<Problem>>> {
    require_admin(state.store(), &auth_user).await?;

    let problems = ProblemService::list_all(state.store()).await?;
    Ok(Json(problems))
}

/// Schedule a new problem
pub async fn create_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<ProblemRequest>,
) -> AppResult<(StatusCode, Json<Problem>)> {
    require_admin(state.store(), &auth_user).await?;
    payload.validate()?;

    let problem = ProblemService::create(state.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

/// Edit a problem
pub async fn update_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<ProblemRequest>,
) -> AppResult<Json<Problem>> {
    require_admin(state.store(), &auth_user).await?;
    payload.validate()?;

    let problem = ProblemService::update(state.store(), &id, payload).await?;
    Ok(Json(problem))
}

/// Delete a problem
pub async fn delete_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_admin(state.store(), &auth_user).await?;

    ProblemService::delete(state.store(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submissions awaiting review
pub async fn list_pending_submissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<PendingSubmissionView>>> {
    require_admin(state.store(), &auth_user).await?;

    let queue = SubmissionService::list_pending(state.store()).await?;
    Ok(Json(queue))
}

/// Accept a submission
pub async fn approve_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Option<Json<ApproveSubmissionRequest>>,
) -> AppResult<Json<ReviewOutcome>> {
    require_admin(state.store(), &auth_user).await?;
    let Json(payload) = payload.unwrap_or_default();

    let outcome = ReviewService::approve(state.store(), &id, payload.is_optimized).await?;
    Ok(Json(outcome))
}

/// Reject a submission
pub async fn reject_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Option<Json<RejectSubmissionRequest>>,
) -> AppResult<Json<ReviewOutcome>> {
    require_admin(state.store(), &auth_user).await?;
    let Json(payload) = payload.unwrap_or_default();

    let outcome = ReviewService::reject(state.store(), &id, payload.is_plagiarized).await?;
    Ok(Json(outcome))
}

/// Recompute a user's leaderboard entry from submission history
pub async fn rebuild_leaderboard_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<RebuildResponse>> {
    require_admin(state.store(), &auth_user).await?;

    let leaderboard_entry = ReviewService::rebuild(state.store(), &user_id).await?;
    Ok(Json(RebuildResponse {
        user_id,
        leaderboard_entry,
    }))
}

/// All users, newest first
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<AdminUsersListResponse>> {
    require_admin(state.store(), &auth_user).await?;

    let users = AdminService::list_users(state.store()).await?;
    Ok(Json(AdminUsersListResponse {
        total: users.len(),
        users,
    }))
}

/// Grant or revoke a role
pub async fn update_user_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> AppResult<Json<User>> {
    require_admin(state.store(), &auth_user).await?;

    let user = AdminService::update_role(state.store(), &id, payload.role, payload.value).await?;
    Ok(Json(user))
}

/// Ban a user
pub async fn ban_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    require_admin(state.store(), &auth_user).await?;

    let user = AdminService::set_banned(state.store(), &id, true).await?;
    Ok(Json(user))
}

/// Lift a ban
pub async fn unban_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    require_admin(state.store(), &auth_user).await?;

    let user = AdminService::set_banned(state.store(), &id, false).await?;
    Ok(Json(user))
}
