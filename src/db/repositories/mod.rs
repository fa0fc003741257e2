//! Database repositories
//!
//! Repositories translate between typed models and store documents. They
//! hold no state; every call takes the store explicitly.

pub mod leaderboard_repo;
pub mod problem_repo;
pub mod submission_repo;
pub mod user_repo;

pub use leaderboard_repo::LeaderboardRepository;
pub use problem_repo::ProblemRepository;
pub use submission_repo::SubmissionRepository;
pub use user_repo::UserRepository;

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;

use crate::{
    constants::MAX_IN_QUERY_IDS,
    db::{Document, DocumentStore, Predicate, Query},
    error::AppResult,
};

/// Fetch documents by id with "id in set" queries, chunked to the store's
/// per-query limit. Unknown ids are skipped; duplicates are fetched once.
pub(crate) async fn find_many<T, I, S>(
    store: &dyn DocumentStore,
    collection: &str,
    ids: I,
) -> AppResult<Vec<T>>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let unique: Vec<String> = ids
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut found = Vec::with_capacity(unique.len());
    for chunk in unique.chunks(MAX_IN_QUERY_IDS) {
        let docs = store
            .query(
                collection,
                &Query::new().filter(Predicate::id_in(chunk.iter().cloned())),
            )
            .await?;
        found.extend(decode_all::<T>(&docs)?);
    }

    Ok(found)
}

pub(crate) fn decode_all<T: DeserializeOwned>(docs: &[Document]) -> AppResult<Vec<T>> {
    Ok(docs
        .iter()
        .map(Document::decode::<T>)
        .collect::<Result<Vec<_>, _>>()?)
}
