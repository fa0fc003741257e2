//! Submission review service
//!
//! Moves a pending submission to `accepted` or `rejected` and keeps the
//! owner's leaderboard entry in step. The submission write and the
//! leaderboard write are separate documents, so a failure between them leaves
//! the submission reviewed and the entry stale; [`ReviewService::rebuild`]
//! re-derives the entry from submission history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    constants::{BASE_SOLUTION_POINTS, LEADERBOARD_CAS_MAX_ATTEMPTS, OPTIMIZATION_BONUS_POINTS},
    db::{
        DocumentStore, StoreError, Versioned,
        repositories::{LeaderboardRepository, SubmissionRepository, UserRepository},
    },
    error::{AppError, AppResult},
    models::{LeaderboardEntry, Submission, SubmissionStatus, User},
};

/// Canonical state after a review, returned to the caller to render from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub submission: Submission,
    /// The owner's entry after the review; `None` when the review did not
    /// touch the leaderboard or the owner has no entry
    pub leaderboard_entry: Option<LeaderboardEntry>,
}

/// Points awarded for an accepted submission
pub fn award_points(is_optimized: bool) -> f64 {
    if is_optimized {
        BASE_SOLUTION_POINTS + OPTIMIZATION_BONUS_POINTS
    } else {
        BASE_SOLUTION_POINTS
    }
}

/// Replay a user's reviewed submissions, in review order, through the same
/// transitions the incremental path applies. Reviews stamped with the same
/// microsecond replay in submission id order.
pub fn fold_history(
    user: &User,
    submissions: &[Submission],
    now: DateTime<Utc>,
) -> Option<LeaderboardEntry> {
    let mut reviewed: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.user_id == user.id && s.status.is_terminal() && s.reviewed_at.is_some())
        .collect();
    reviewed.sort_by(|a, b| a.reviewed_at.cmp(&b.reviewed_at).then_with(|| a.id.cmp(&b.id)));

    reviewed
        .into_iter()
        .fold(None, |entry: Option<LeaderboardEntry>, submission| {
            match (submission.status, entry) {
                (SubmissionStatus::Accepted, None) => Some(LeaderboardEntry::seeded(
                    user,
                    submission.points,
                    submission.solved_on(),
                    now,
                )),
                (SubmissionStatus::Accepted, Some(mut entry)) => {
                    entry.record_acceptance(submission.points, submission.solved_on(), now);
                    Some(entry)
                }
                (SubmissionStatus::Rejected, Some(mut entry)) if submission.is_plagiarized => {
                    entry.apply_plagiarism_penalty(now);
                    Some(entry)
                }
                (_, entry) => entry,
            }
        })
}

/// Submission review service
pub struct ReviewService;

impl ReviewService {
    /// Accept a pending submission and credit the owner's leaderboard entry
    pub async fn approve(
        store: &dyn DocumentStore,
        submission_id: &str,
        is_optimized: bool,
    ) -> AppResult<ReviewOutcome> {
        let Versioned {
            version,
            data: mut submission,
        } = Self::load_pending(store, submission_id).await?;

        let now = Utc::now();
        submission.status = SubmissionStatus::Accepted;
        submission.points = award_points(is_optimized);
        submission.is_optimized = is_optimized;
        submission.reviewed_at = Some(now);

        let submission = Self::save_transition(store, version, &submission).await?;
        info!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            points = submission.points,
            is_optimized,
            "Submission accepted"
        );

        let leaderboard_entry = Self::credit_acceptance(store, &submission, now)
            .await
            .inspect_err(|e| {
                error!(
                    submission_id = %submission.id,
                    user_id = %submission.user_id,
                    error = %e,
                    "Submission accepted but leaderboard entry not updated; rebuild required"
                )
            })?;

        Ok(ReviewOutcome {
            submission,
            leaderboard_entry,
        })
    }

    /// Reject a pending submission, applying the plagiarism penalty if flagged
    pub async fn reject(
        store: &dyn DocumentStore,
        submission_id: &str,
        is_plagiarized: bool,
    ) -> AppResult<ReviewOutcome> {
        let Versioned {
            version,
            data: mut submission,
        } = Self::load_pending(store, submission_id).await?;

        let now = Utc::now();
        submission.status = SubmissionStatus::Rejected;
        submission.is_plagiarized = is_plagiarized;
        submission.reviewed_at = Some(now);

        let submission = Self::save_transition(store, version, &submission).await?;
        info!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            is_plagiarized,
            "Submission rejected"
        );

        let leaderboard_entry = if is_plagiarized {
            Self::modify_existing_entry(store, &submission.user_id, |entry| {
                entry.apply_plagiarism_penalty(now)
            })
            .await
            .inspect_err(|e| {
                error!(
                    submission_id = %submission.id,
                    user_id = %submission.user_id,
                    error = %e,
                    "Submission rejected but plagiarism penalty not applied; rebuild required"
                )
            })?
        } else {
            None
        };

        Ok(ReviewOutcome {
            submission,
            leaderboard_entry,
        })
    }

    /// Recompute a user's leaderboard entry from their submission history
    /// and overwrite the stored one. Idempotent.
    ///
    /// The entry is read before the history and written back with
    /// compare-and-swap, so a review credited in between forces a re-read
    /// instead of being overwritten.
    pub async fn rebuild(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> AppResult<Option<LeaderboardEntry>> {
        let user = UserRepository::find_by_id(store, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        for attempt in 1..=LEADERBOARD_CAS_MAX_ATTEMPTS {
            let current = LeaderboardRepository::find(store, user_id).await?;
            let submissions = SubmissionRepository::list_by_user(store, user_id).await?;
            let now = Utc::now();

            let rebuilt = match (fold_history(&user, &submissions, now), &current) {
                (Some(entry), _) => entry,
                // Entries are never deleted; one with no history left is zeroed.
                (None, Some(Versioned { data, .. })) => LeaderboardEntry {
                    points: 0.0,
                    problems_solved: 0,
                    streak: 0,
                    last_solved_on: None,
                    last_updated: now,
                    ..data.clone()
                },
                (None, None) => {
                    debug!(user_id, "No review history and no entry; nothing to rebuild");
                    return Ok(None);
                }
            };

            let written = match &current {
                Some(Versioned { version, .. }) => {
                    LeaderboardRepository::replace_if_version(store, *version, &rebuilt).await
                }
                None => LeaderboardRepository::create(store, &rebuilt).await,
            };

            match written {
                Ok(entry) => {
                    info!(
                        user_id,
                        points = entry.points,
                        problems_solved = entry.problems_solved,
                        "Leaderboard entry rebuilt from submission history"
                    );
                    return Ok(Some(entry));
                }
                Err(StoreError::VersionConflict { .. } | StoreError::AlreadyExists { .. }) => {
                    debug!(user_id, attempt, "Leaderboard entry changed during rebuild; retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(format!(
            "Leaderboard entry for {user_id} kept changing; gave up after {LEADERBOARD_CAS_MAX_ATTEMPTS} attempts"
        )))
    }

    async fn load_pending(
        store: &dyn DocumentStore,
        submission_id: &str,
    ) -> AppResult<Versioned<Submission>> {
        let found = SubmissionRepository::find_by_id(store, submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if found.data.status.is_terminal() {
            warn!(
                submission_id,
                status = %found.data.status,
                "Refusing to review a submission twice"
            );
            return Err(AppError::Conflict(format!(
                "Submission was already {}",
                found.data.status
            )));
        }

        Ok(found)
    }

    async fn save_transition(
        store: &dyn DocumentStore,
        version: u64,
        submission: &Submission,
    ) -> AppResult<Submission> {
        SubmissionRepository::save_review(store, version, submission)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => {
                    AppError::Conflict("Submission was reviewed concurrently".to_string())
                }
                other => other,
            })
    }

    /// Add an acceptance to the owner's entry, creating it on first solve.
    async fn credit_acceptance(
        store: &dyn DocumentStore,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> AppResult<Option<LeaderboardEntry>> {
        let user_id = submission.user_id.as_str();

        for attempt in 1..=LEADERBOARD_CAS_MAX_ATTEMPTS {
            let written = match LeaderboardRepository::find(store, user_id).await? {
                Some(Versioned {
                    version,
                    data: mut entry,
                }) => {
                    entry.record_acceptance(submission.points, submission.solved_on(), now);
                    LeaderboardRepository::replace_if_version(store, version, &entry).await
                }
                None => {
                    let Some(user) = UserRepository::find_by_id(store, user_id).await? else {
                        warn!(user_id, "Submission owner has no user record; leaderboard entry not created");
                        return Ok(None);
                    };
                    let entry = LeaderboardEntry::seeded(
                        &user,
                        submission.points,
                        submission.solved_on(),
                        now,
                    );
                    LeaderboardRepository::create(store, &entry).await
                }
            };

            match written {
                Ok(entry) => return Ok(Some(entry)),
                Err(StoreError::VersionConflict { .. } | StoreError::AlreadyExists { .. }) => {
                    debug!(user_id, attempt, "Leaderboard entry changed concurrently; retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(format!(
            "Leaderboard entry for {user_id} kept changing; gave up after {LEADERBOARD_CAS_MAX_ATTEMPTS} attempts"
        )))
    }

    /// Apply `change` to an existing entry with compare-and-swap. Returns
    /// `None` if the user has no entry.
    async fn modify_existing_entry<F>(
        store: &dyn DocumentStore,
        user_id: &str,
        change: F,
    ) -> AppResult<Option<LeaderboardEntry>>
    where
        F: Fn(&mut LeaderboardEntry),
    {
        for attempt in 1..=LEADERBOARD_CAS_MAX_ATTEMPTS {
            let Some(Versioned {
                version,
                data: mut entry,
            }) = LeaderboardRepository::find(store, user_id).await?
            else {
                return Ok(None);
            };

            change(&mut entry);

            match LeaderboardRepository::replace_if_version(store, version, &entry).await {
                Ok(entry) => return Ok(Some(entry)),
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(user_id, attempt, "Leaderboard entry changed concurrently; retrying");
                }
                Err(StoreError::NotFound { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(format!(
            "Leaderboard entry for {user_id} kept changing; gave up after {LEADERBOARD_CAS_MAX_ATTEMPTS} attempts"
        )))
    }
}
