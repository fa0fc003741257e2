//! Submission request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_PULL_REQUEST_URL_LENGTH;

/// Submit a solution
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[validate(length(min = 1))]
    pub problem_id: String,

    #[validate(length(min = 1, max = MAX_PULL_REQUEST_URL_LENGTH))]
    pub pull_request_url: String,
}
