//! Submission response DTOs

use serde::Serialize;

use crate::models::Submission;

pub const UNKNOWN_PROBLEM_TITLE: &str = "Unknown Problem";
pub const UNKNOWN_USERNAME: &str = "Unknown User";

/// A submission on a user's profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub problem_title: String,
}

/// A submission in the admin review queue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub username: String,
    pub user_photo_url: String,
    pub problem_title: String,
}
