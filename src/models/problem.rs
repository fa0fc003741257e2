//! Problem model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A challenge problem, optionally scheduled as the daily problem for `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: String,
    /// Calendar date, stored as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// Problem difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// Which slice of the schedule to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemWindow {
    /// Sunday of the current week through today
    #[default]
    Week,
    /// The last 30 days through today
    Archive,
}
