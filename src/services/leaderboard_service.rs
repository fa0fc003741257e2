//! Leaderboard read service

use tracing::debug;

use crate::{
    constants::MAX_LEADERBOARD_LIMIT,
    db::{DocumentStore, repositories::LeaderboardRepository},
    error::AppResult,
    models::{LeaderboardEntry, LeaderboardFilter, RankedEntry},
};

/// Leaderboard service
pub struct LeaderboardService;

impl LeaderboardService {
    /// Top entries for the home page
    pub async fn preview(store: &dyn DocumentStore, limit: usize) -> AppResult<Vec<RankedEntry>> {
        Self::list(store, LeaderboardFilter::All, limit).await
    }

    /// Entries by points, highest first, optionally filtered by membership.
    /// Ranks are positions in the returned page.
    pub async fn list(
        store: &dyn DocumentStore,
        filter: LeaderboardFilter,
        limit: usize,
    ) -> AppResult<Vec<RankedEntry>> {
        let limit = limit.min(MAX_LEADERBOARD_LIMIT);
        let entries = LeaderboardRepository::top(store, filter.membership(), limit).await?;
        debug!(?filter, limit, returned = entries.len(), "Leaderboard listed");

        Ok(rank(entries))
    }

    /// Overall rank of a user: one more than the number of entries with
    /// strictly more points. `None` if the user has no entry.
    pub async fn rank_of(store: &dyn DocumentStore, user_id: &str) -> AppResult<Option<u32>> {
        let Some(entry) = LeaderboardRepository::find(store, user_id).await? else {
            return Ok(None);
        };

        let ahead = LeaderboardRepository::count_above(store, entry.data.points).await?;
        Ok(Some(ahead as u32 + 1))
    }
}

fn rank(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries
        .into_iter()
        .zip(1u32..)
        .map(|(entry, rank)| RankedEntry { rank, entry })
        .collect()
}
