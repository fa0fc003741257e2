//! Problem response DTOs

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Problem, ProblemWindow};

/// A problem as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemView {
    #[serde(flatten)]
    pub problem: Problem,
    /// Whether the viewer has an accepted solution; absent for anonymous viewers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved: Option<bool>,
}

/// Today's problem
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProblemResponse {
    pub date: NaiveDate,
    pub problem: Option<Problem>,
}

/// Problem list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsListResponse {
    pub window: ProblemWindow,
    pub problems: Vec<ProblemView>,
    pub total: usize,
}
