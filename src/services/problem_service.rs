//! Problem service

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{
        DocumentStore,
        repositories::{ProblemRepository, SubmissionRepository},
    },
    error::{AppError, AppResult},
    handlers::{admin::request::ProblemRequest, problems::response::ProblemView},
    models::{Problem, ProblemWindow, SubmissionStatus},
    utils::{archive_start, parse_date, sanitize_string, week_start},
};

/// Problem service for business logic
pub struct ProblemService;

impl ProblemService {
    /// The problem scheduled for `today`
    pub async fn daily(store: &dyn DocumentStore, today: NaiveDate) -> AppResult<Option<Problem>> {
        ProblemRepository::find_by_date(store, today).await
    }

    /// Problems scheduled within a window ending today, latest first. With a
    /// viewer each problem is marked solved or not.
    pub async fn list(
        store: &dyn DocumentStore,
        window: ProblemWindow,
        today: NaiveDate,
        viewer: Option<&str>,
    ) -> AppResult<Vec<ProblemView>> {
        let start = match window {
            ProblemWindow::Week => week_start(today),
            ProblemWindow::Archive => archive_start(today),
        };
        let problems = ProblemRepository::list_between(store, start, today).await?;

        let solved: Option<HashSet<String>> = match viewer {
            Some(user_id) => Some(
                SubmissionRepository::list_by_user_and_status(
                    store,
                    user_id,
                    SubmissionStatus::Accepted,
                )
                .await?
                .into_iter()
                .map(|s| s.problem_id)
                .collect(),
            ),
            None => None,
        };

        Ok(problems
            .into_iter()
            .map(|problem| ProblemView {
                solved: solved.as_ref().map(|ids| ids.contains(&problem.id)),
                problem,
            })
            .collect())
    }

    /// Every problem, latest first
    pub async fn list_all(store: &dyn DocumentStore) -> AppResult<Vec<Problem>> {
        ProblemRepository::list_all(store).await
    }

    /// Create a new problem
    pub async fn create(store: &dyn DocumentStore, payload: ProblemRequest) -> AppResult<Problem> {
        let problem = draft(Uuid::new_v4().to_string(), payload)?;
        let problem = ProblemRepository::create(store, &problem).await?;

        info!(problem_id = %problem.id, date = %problem.date, "Problem created");
        Ok(problem)
    }

    /// Replace a problem's editable fields
    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        payload: ProblemRequest,
    ) -> AppResult<Problem> {
        let problem = draft(id.to_string(), payload)?;
        let problem = ProblemRepository::update(store, &problem).await?;

        info!(problem_id = %problem.id, date = %problem.date, "Problem updated");
        Ok(problem)
    }

    /// Delete a problem. Submissions referencing it are kept.
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
        if ProblemRepository::find_by_id(store, id).await?.is_none() {
            return Err(AppError::NotFound("Problem not found".to_string()));
        }

        ProblemRepository::delete(store, id).await?;
        info!(problem_id = id, "Problem deleted");
        Ok(())
    }
}

fn draft(id: String, payload: ProblemRequest) -> AppResult<Problem> {
    let title = sanitize_string(&payload.title);
    let description = payload.description.trim().to_string();

    if title.is_empty() || description.is_empty() || payload.date.trim().is_empty() {
        return Err(AppError::Validation(
            "Title, description and date are required".to_string(),
        ));
    }

    let date = parse_date(&payload.date)
        .ok_or_else(|| AppError::Validation("Date must be formatted as YYYY-MM-DD".to_string()))?;

    Ok(Problem {
        id,
        title,
        description,
        difficulty: payload.difficulty,
        category: sanitize_string(&payload.category),
        date,
    })
}
