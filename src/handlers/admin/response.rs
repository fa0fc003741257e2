//! Admin response DTOs

use serde::Serialize;

use crate::models::{LeaderboardEntry, User};

/// Dashboard totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_users: usize,
    pub total_problems: usize,
    pub pending_submissions: usize,
    pub accepted_submissions: usize,
    pub rejected_submissions: usize,
}

/// User list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUsersListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// Result of a leaderboard rebuild
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildResponse {
    pub user_id: String,
    pub leaderboard_entry: Option<LeaderboardEntry>,
}
