//! User response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::User;

/// Public view of a user profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub photo_url: String,
    pub is_techtronica: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub joined_at: DateTime<Utc>,
}

impl From<User> for PublicProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            photo_url: user.photo_url,
            is_techtronica: user.is_techtronica,
            joined_at: user.joined_at,
        }
    }
}

/// Profile statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_points: f64,
    pub problems_solved: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub optimized_solutions: u32,
    /// Overall rank; absent until the first accepted solution
    pub rank: Option<u32>,
}

/// An achievement badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}
