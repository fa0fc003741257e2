//! Submission service

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    db::{
        DocumentStore,
        repositories::{ProblemRepository, SubmissionRepository, UserRepository},
    },
    error::{AppError, AppResult},
    handlers::submissions::response::{
        PendingSubmissionView, UNKNOWN_PROBLEM_TITLE, UNKNOWN_USERNAME, UserSubmissionView,
    },
    models::{Problem, Submission, SubmissionStatus, User},
    utils::validate_pull_request_url,
};

/// Submission service
pub struct SubmissionService;

impl SubmissionService {
    /// Submit a pull request as a solution. The submission starts pending.
    pub async fn create(
        store: &dyn DocumentStore,
        user_id: &str,
        problem_id: &str,
        pull_request_url: &str,
    ) -> AppResult<Submission> {
        let user = UserRepository::find_by_id(store, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_banned {
            warn!(user_id, "Banned user attempted to submit");
            return Err(AppError::Forbidden("Account is banned".to_string()));
        }

        if ProblemRepository::find_by_id(store, problem_id).await?.is_none() {
            return Err(AppError::NotFound("Problem not found".to_string()));
        }

        let pull_request_url = pull_request_url.trim();
        validate_pull_request_url(pull_request_url)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            problem_id: problem_id.to_string(),
            pull_request_url: pull_request_url.to_string(),
            status: SubmissionStatus::Pending,
            points: 0.0,
            is_optimized: false,
            is_plagiarized: false,
            submitted_at: Utc::now(),
            reviewed_at: None,
        };

        let submission = SubmissionRepository::create(store, &submission).await?;
        info!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            problem_id = %submission.problem_id,
            "Submission received"
        );

        Ok(submission)
    }

    /// A user's submissions, newest first, with problem titles. Unknown
    /// usernames have no submissions.
    pub async fn list_for_username(
        store: &dyn DocumentStore,
        username: &str,
    ) -> AppResult<Vec<UserSubmissionView>> {
        let Some(user) = UserRepository::find_by_username(store, username).await? else {
            return Ok(Vec::new());
        };

        let submissions = SubmissionRepository::list_by_user(store, &user.id).await?;
        let problems = problems_by_id(store, &submissions).await?;

        Ok(submissions
            .into_iter()
            .map(|submission| UserSubmissionView {
                problem_title: problem_title(&problems, &submission.problem_id),
                submission,
            })
            .collect())
    }

    /// The review queue, newest first, with submitter and problem details
    pub async fn list_pending(store: &dyn DocumentStore) -> AppResult<Vec<PendingSubmissionView>> {
        let submissions =
            SubmissionRepository::list_by_status(store, SubmissionStatus::Pending).await?;

        let (users, problems) = futures::try_join!(
            UserRepository::find_by_ids(store, submissions.iter().map(|s| s.user_id.clone())),
            problems_by_id(store, &submissions),
        )?;
        let users: HashMap<String, User> = users.into_iter().map(|u| (u.id.clone(), u)).collect();

        Ok(submissions
            .into_iter()
            .map(|submission| {
                let user = users.get(&submission.user_id);
                PendingSubmissionView {
                    username: user
                        .map(|u| u.username.clone())
                        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string()),
                    user_photo_url: user.map(|u| u.photo_url.clone()).unwrap_or_default(),
                    problem_title: problem_title(&problems, &submission.problem_id),
                    submission,
                }
            })
            .collect())
    }
}

async fn problems_by_id(
    store: &dyn DocumentStore,
    submissions: &[Submission],
) -> AppResult<HashMap<String, Problem>> {
    let problems =
        ProblemRepository::find_by_ids(store, submissions.iter().map(|s| s.problem_id.clone()))
            .await?;

    Ok(problems.into_iter().map(|p| (p.id.clone(), p)).collect())
}

fn problem_title(problems: &HashMap<String, Problem>, problem_id: &str) -> String {
    problems
        .get(problem_id)
        .map(|p| p.title.clone())
        .unwrap_or_else(|| UNKNOWN_PROBLEM_TITLE.to_string())
}
