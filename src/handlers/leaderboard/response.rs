//! Leaderboard response DTOs

use serde::Serialize;

use crate::models::RankedEntry;

/// A ranked page of the leaderboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedEntry>,
    pub total: usize,
}

impl From<Vec<RankedEntry>> for LeaderboardResponse {
    fn from(entries: Vec<RankedEntry>) -> Self {
        Self {
            total: entries.len(),
            entries,
        }
    }
}
