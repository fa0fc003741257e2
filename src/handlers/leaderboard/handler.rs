//! Leaderboard handler implementations

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    constants::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LEADERBOARD_PREVIEW_LIMIT},
    error::AppResult,
    services::LeaderboardService,
    state::AppState,
};

use super::{
    request::{LeaderboardQuery, PreviewQuery},
    response::LeaderboardResponse,
};

/// Top of the leaderboard for the home page
pub async fn preview_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_PREVIEW_LIMIT);
    let entries = LeaderboardService::preview(state.store(), limit).await?;

    Ok(Json(entries.into()))
}

/// Full leaderboard, optionally filtered by membership
pub async fn list_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    let entries = LeaderboardService::list(state.store(), query.filter, limit).await?;

    Ok(Json(entries.into()))
}
