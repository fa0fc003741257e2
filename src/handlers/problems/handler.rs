//! Problem handler implementations

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppResult,
    middleware::auth::OptionalAuth,
    services::ProblemService,
    state::AppState,
    utils::today_utc,
};

use super::{
    request::ListProblemsQuery,
    response::{DailyProblemResponse, ProblemsListResponse},
};

/// Today's problem, if one is scheduled
pub async fn get_daily_problem(
    State(state): State<AppState>,
) -> AppResult<Json<DailyProblemResponse>> {
    let date = today_utc();
    let problem = ProblemService::daily(state.store(), date).await?;

    Ok(Json(DailyProblemResponse { date, problem }))
}

/// This week's problems or the archive; signed-in viewers get solved flags
pub async fn list_problems(
    State(state): State<AppState>,
    OptionalAuth(auth_user): OptionalAuth,
    Query(query): Query<ListProblemsQuery>,
) -> AppResult<Json<ProblemsListResponse>> {
    let viewer = auth_user.as_ref().map(|u| u.id.as_str());
    let problems =
        ProblemService::list(state.store(), query.window, today_utc(), viewer).await?;

    Ok(Json(ProblemsListResponse {
        window: query.window,
        total: problems.len(),
        problems,
    }))
}
