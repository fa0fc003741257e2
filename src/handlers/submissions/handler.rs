//! Submission handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::Submission,
    services::SubmissionService,
    state::AppState,
};

use super::request::CreateSubmissionRequest;

/// Submit a pull request for review
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<Submission>)> {
    payload.validate()?;

    let submission = SubmissionService::create(
        state.store(),
        &auth_user.id,
        &payload.problem_id,
        &payload.pull_request_url,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}
