//! Admin request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{
        MAX_PROBLEM_CATEGORY_LENGTH, MAX_PROBLEM_DESCRIPTION_LENGTH, MAX_PROBLEM_TITLE_LENGTH,
    },
    models::{Difficulty, Role},
};

/// Create or edit a problem
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(min = 1, max = MAX_PROBLEM_DESCRIPTION_LENGTH))]
    pub description: String,

    pub difficulty: Difficulty,

    #[serde(default)]
    #[validate(length(max = MAX_PROBLEM_CATEGORY_LENGTH))]
    pub category: String,

    /// Scheduled date, `YYYY-MM-DD`
    #[validate(length(min = 1))]
    pub date: String,
}

/// Approve a pending submission
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveSubmissionRequest {
    #[serde(default)]
    pub is_optimized: bool,
}

/// Reject a pending submission
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectSubmissionRequest {
    #[serde(default)]
    pub is_plagiarized: bool,
}

/// Grant or revoke a role
#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: Role,
    pub value: bool,
}
