//! Leaderboard request DTOs

use serde::Deserialize;

use crate::models::LeaderboardFilter;

/// Leaderboard preview query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub limit: Option<usize>,
}

/// Leaderboard list query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub filter: LeaderboardFilter,
    pub limit: Option<usize>,
}
