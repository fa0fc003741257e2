//! Leaderboard repository

use serde_json::{Map, Value};

use crate::{
    constants::collections::LEADERBOARD,
    db::{Direction, DocumentStore, Predicate, Query, StoreError, Versioned, document::encode},
    error::AppResult,
    models::LeaderboardEntry,
};

use super::decode_all;

/// Repository for leaderboard entries (document id == user id)
pub struct LeaderboardRepository;

impl LeaderboardRepository {
    /// Find a user's entry along with its document version
    pub async fn find(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> AppResult<Option<Versioned<LeaderboardEntry>>> {
        let doc = store.get(LEADERBOARD, user_id).await?;
        Ok(doc.map(|d| d.decode_versioned()).transpose()?)
    }

    /// Create an entry. Surfaces the raw store error so callers can tell a
    /// lost creation race (`AlreadyExists`) from a failure.
    pub async fn create(
        store: &dyn DocumentStore,
        entry: &LeaderboardEntry,
    ) -> Result<LeaderboardEntry, StoreError> {
        let doc = store
            .create(LEADERBOARD, &entry.user_id, encode(entry)?)
            .await?;
        doc.decode()
    }

    /// Conditionally replace an entry read at `version`. Surfaces
    /// `VersionConflict` so callers can retry.
    pub async fn replace_if_version(
        store: &dyn DocumentStore,
        version: u64,
        entry: &LeaderboardEntry,
    ) -> Result<LeaderboardEntry, StoreError> {
        let doc = store
            .update_if_version(LEADERBOARD, &entry.user_id, version, encode(entry)?)
            .await?;
        doc.decode()
    }

    /// Mirror the membership flag onto an existing entry. Returns `None` if
    /// the user has no entry yet.
    pub async fn set_membership(
        store: &dyn DocumentStore,
        user_id: &str,
        is_techtronica: bool,
    ) -> AppResult<Option<LeaderboardEntry>> {
        let mut fields = Map::new();
        fields.insert("isTechtronica".to_string(), Value::Bool(is_techtronica));

        match store.update(LEADERBOARD, user_id, fields).await {
            Ok(doc) => Ok(Some(doc.decode()?)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries by points, highest first
    pub async fn top(
        store: &dyn DocumentStore,
        membership: Option<bool>,
        limit: usize,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let mut query = Query::new();
        if let Some(is_techtronica) = membership {
            query = query.filter(Predicate::eq("isTechtronica", is_techtronica));
        }
        let query = query
            .order_by("points", Direction::Descending)
            .limit(limit);

        let docs = store.query(LEADERBOARD, &query).await?;
        decode_all(&docs)
    }

    /// Number of entries with strictly more points
    pub async fn count_above(store: &dyn DocumentStore, points: f64) -> AppResult<usize> {
        let docs = store
            .query(LEADERBOARD, &Query::new().filter(Predicate::gt("points", points)))
            .await?;

        Ok(docs.len())
    }
}
