//! Submission repository

use crate::{
    constants::collections::SUBMISSIONS,
    db::{Direction, DocumentStore, Predicate, Query, Versioned, document::encode},
    error::AppResult,
    models::{Submission, SubmissionStatus},
};

use super::decode_all;

/// Repository for submission documents
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Insert a new submission
    pub async fn create(store: &dyn DocumentStore, submission: &Submission) -> AppResult<Submission> {
        let doc = store
            .create(SUBMISSIONS, &submission.id, encode(submission)?)
            .await?;
        Ok(doc.decode()?)
    }

    /// Find submission by ID along with its document version
    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> AppResult<Option<Versioned<Submission>>> {
        let doc = store.get(SUBMISSIONS, id).await?;
        Ok(doc.map(|d| d.decode_versioned()).transpose()?)
    }

    /// Write a reviewed submission, provided nobody else wrote it since
    /// `version` was read. Fails with `Conflict` otherwise.
    pub async fn save_review(
        store: &dyn DocumentStore,
        version: u64,
        submission: &Submission,
    ) -> AppResult<Submission> {
        let doc = store
            .update_if_version(SUBMISSIONS, &submission.id, version, encode(submission)?)
            .await?;
        Ok(doc.decode()?)
    }

    /// A user's submissions, newest first
    pub async fn list_by_user(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> AppResult<Vec<Submission>> {
        let docs = store
            .query(
                SUBMISSIONS,
                &Query::new()
                    .filter(Predicate::eq("userId", user_id))
                    .order_by("submittedAt", Direction::Descending),
            )
            .await?;

        decode_all(&docs)
    }

    /// A user's submissions in a given status
    pub async fn list_by_user_and_status(
        store: &dyn DocumentStore,
        user_id: &str,
        status: SubmissionStatus,
    ) -> AppResult<Vec<Submission>> {
        let docs = store
            .query(
                SUBMISSIONS,
                &Query::new()
                    .filter(Predicate::eq("userId", user_id))
                    .filter(Predicate::eq("status", status.as_str())),
            )
            .await?;

        decode_all(&docs)
    }

    /// Submissions in a given status, newest first
    pub async fn list_by_status(
        store: &dyn DocumentStore,
        status: SubmissionStatus,
    ) -> AppResult<Vec<Submission>> {
        let docs = store
            .query(
                SUBMISSIONS,
                &Query::new()
                    .filter(Predicate::eq("status", status.as_str()))
                    .order_by("submittedAt", Direction::Descending),
            )
            .await?;

        decode_all(&docs)
    }

    /// Count submissions by status
    pub async fn count_by_status(
        store: &dyn DocumentStore,
        status: SubmissionStatus,
    ) -> AppResult<usize> {
        let docs = store
            .query(
                SUBMISSIONS,
                &Query::new().filter(Predicate::eq("status", status.as_str())),
            )
            .await?;

        Ok(docs.len())
    }
}
