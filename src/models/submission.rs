//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::statuses;

/// A pull-request solution to a problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub pull_request_url: String,
    pub status: SubmissionStatus,
    /// Awarded points; zero until accepted
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub is_optimized: bool,
    #[serde(default)]
    pub is_plagiarized: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub submitted_at: DateTime<Utc>,
    /// Microsecond precision: review order is replayed from this field
    #[serde(
        default,
        with = "chrono::serde::ts_microseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Submission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => statuses::PENDING,
            Self::Accepted => statuses::ACCEPTED,
            Self::Rejected => statuses::REJECTED,
        }
    }

    /// Accepted and rejected submissions never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Submission {
    /// UTC calendar day the solution was submitted on; drives streaks.
    pub fn solved_on(&self) -> chrono::NaiveDate {
        self.submitted_at.date_naive()
    }
}
