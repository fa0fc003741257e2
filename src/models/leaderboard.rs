//! Leaderboard aggregate
//!
//! One entry per user, keyed by user id. The entry is a cache of the user's
//! review history: the same transitions below are used both for incremental
//! updates and for rebuilding an entry from scratch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PLAGIARISM_PENALTY_POINTS;

use super::User;

/// Per-user leaderboard aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub photo_url: String,
    /// Mirrors the user's `isTechtronica`
    #[serde(default)]
    pub is_techtronica: bool,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub problems_solved: u32,
    #[serde(default)]
    pub streak: u32,
    /// Written as `null` when unset so a merge clears a stale day
    #[serde(default)]
    pub last_solved_on: Option<NaiveDate>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// First acceptance for a user
    pub fn seeded(user: &User, points: f64, solved_on: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            photo_url: user.photo_url.clone(),
            is_techtronica: user.is_techtronica,
            points,
            problems_solved: 1,
            streak: 1,
            last_solved_on: Some(solved_on),
            last_updated: now,
        }
    }

    pub fn record_acceptance(&mut self, points: f64, solved_on: NaiveDate, now: DateTime<Utc>) {
        self.points += points;
        self.problems_solved += 1;
        self.advance_streak(solved_on);
        self.last_updated = now;
    }

    /// Plagiarism penalty, floored at zero
    pub fn apply_plagiarism_penalty(&mut self, now: DateTime<Utc>) {
        self.points = (self.points - PLAGIARISM_PENALTY_POINTS).max(0.0);
        self.last_updated = now;
    }

    fn advance_streak(&mut self, solved_on: NaiveDate) {
        match self.last_solved_on {
            Some(last) if solved_on <= last => {}
            Some(last) if last.succ_opt() == Some(solved_on) => {
                self.streak += 1;
                self.last_solved_on = Some(solved_on);
            }
            _ => {
                self.streak = 1;
                self.last_solved_on = Some(solved_on);
            }
        }
    }
}

/// A leaderboard entry with its position in a returned page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Membership filter for leaderboard listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardFilter {
    #[default]
    All,
    Techtronica,
    Open,
}

impl LeaderboardFilter {
    /// Required membership flag, if any
    pub fn membership(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Techtronica => Some(true),
            Self::Open => Some(false),
        }
    }
}
