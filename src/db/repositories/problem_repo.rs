//! Problem repository

use chrono::NaiveDate;

use crate::{
    constants::collections::PROBLEMS,
    db::{Direction, DocumentStore, Predicate, Query, StoreError, document::encode},
    error::{AppError, AppResult},
    models::Problem,
    utils::format_date,
};

use super::{decode_all, find_many};

/// Repository for problem documents
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem
    pub async fn create(store: &dyn DocumentStore, problem: &Problem) -> AppResult<Problem> {
        let doc = store.create(PROBLEMS, &problem.id, encode(problem)?).await?;
        Ok(doc.decode()?)
    }

    /// Find problem by ID
    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> AppResult<Option<Problem>> {
        let doc = store.get(PROBLEMS, id).await?;
        Ok(doc.map(|d| d.decode()).transpose()?)
    }

    /// Find the problem scheduled for a date
    pub async fn find_by_date(
        store: &dyn DocumentStore,
        date: NaiveDate,
    ) -> AppResult<Option<Problem>> {
        let docs = store
            .query(
                PROBLEMS,
                &Query::new()
                    .filter(Predicate::eq("date", format_date(date)))
                    .limit(1),
            )
            .await?;

        Ok(docs.first().map(|d| d.decode()).transpose()?)
    }

    /// Find several problems by ID
    pub async fn find_by_ids<I, S>(store: &dyn DocumentStore, ids: I) -> AppResult<Vec<Problem>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        find_many(store, PROBLEMS, ids).await
    }

    /// Problems scheduled between two dates (inclusive), latest first
    pub async fn list_between(
        store: &dyn DocumentStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Problem>> {
        let docs = store
            .query(
                PROBLEMS,
                &Query::new()
                    .filter(Predicate::gte("date", format_date(start)))
                    .filter(Predicate::lte("date", format_date(end)))
                    .order_by("date", Direction::Descending),
            )
            .await?;

        decode_all(&docs)
    }

    /// All problems, latest first
    pub async fn list_all(store: &dyn DocumentStore) -> AppResult<Vec<Problem>> {
        let docs = store
            .query(PROBLEMS, &Query::new().order_by("date", Direction::Descending))
            .await?;

        decode_all(&docs)
    }

    /// Replace the editable fields of an existing problem
    pub async fn update(store: &dyn DocumentStore, problem: &Problem) -> AppResult<Problem> {
        let doc = store
            .update(PROBLEMS, &problem.id, encode(problem)?)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppError::NotFound("Problem not found".to_string()),
                other => other.into(),
            })?;

        Ok(doc.decode()?)
    }

    /// Delete a problem
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
        store.delete(PROBLEMS, id).await?;
        Ok(())
    }

    /// Count problems
    pub async fn count(store: &dyn DocumentStore) -> AppResult<usize> {
        Ok(store.query(PROBLEMS, &Query::new()).await?.len())
    }
}
