//! User profile service

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    constants::badges,
    db::{
        DocumentStore,
        repositories::{LeaderboardRepository, SubmissionRepository, UserRepository},
    },
    error::{AppError, AppResult},
    handlers::users::response::{BadgeResponse, UserStatsResponse},
    models::{SubmissionStatus, User},
    services::LeaderboardService,
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by username
    pub async fn get_by_username(store: &dyn DocumentStore, username: &str) -> AppResult<User> {
        UserRepository::find_by_username(store, username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Profile statistics. Totals come from the leaderboard entry; the
    /// longest streak and optimized count come from submission history.
    pub async fn stats(store: &dyn DocumentStore, username: &str) -> AppResult<UserStatsResponse> {
        let user = Self::get_by_username(store, username).await?;

        let (entry, accepted, rank) = futures::try_join!(
            LeaderboardRepository::find(store, &user.id),
            SubmissionRepository::list_by_user_and_status(
                store,
                &user.id,
                SubmissionStatus::Accepted
            ),
            LeaderboardService::rank_of(store, &user.id),
        )?;
        let entry = entry.map(|v| v.data);

        let solve_days: BTreeSet<NaiveDate> = accepted.iter().map(|s| s.solved_on()).collect();
        let optimized = accepted.iter().filter(|s| s.is_optimized).count() as u32;

        Ok(UserStatsResponse {
            total_points: entry.as_ref().map_or(0.0, |e| e.points),
            problems_solved: entry.as_ref().map_or(0, |e| e.problems_solved),
            current_streak: entry.as_ref().map_or(0, |e| e.streak),
            longest_streak: longest_run(&solve_days),
            optimized_solutions: optimized,
            rank,
        })
    }

    /// Badges derived from the profile statistics
    pub async fn badges(
        store: &dyn DocumentStore,
        username: &str,
    ) -> AppResult<Vec<BadgeResponse>> {
        let stats = Self::stats(store, username).await?;
        Ok(badges_for(&stats))
    }
}

/// Longest run of consecutive calendar days
fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        current = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }

    longest
}

pub fn badges_for(stats: &UserStatsResponse) -> Vec<BadgeResponse> {
    let in_top = stats.rank.is_some_and(|rank| rank <= badges::TOP_RANK);

    vec![
        BadgeResponse {
            id: "streak-7",
            kind: "streak",
            name: "Week Warrior",
            description: "Solve problems 7 days in a row",
            earned: stats.longest_streak >= badges::SHORT_STREAK_DAYS,
        },
        BadgeResponse {
            id: "streak-30",
            kind: "streak",
            name: "Monthly Master",
            description: "Solve problems 30 days in a row",
            earned: stats.longest_streak >= badges::LONG_STREAK_DAYS,
        },
        BadgeResponse {
            id: "problems-10",
            kind: "problems",
            name: "Problem Solver",
            description: "Solve 10 problems",
            earned: stats.problems_solved >= badges::FEW_PROBLEMS,
        },
        BadgeResponse {
            id: "problems-50",
            kind: "problems",
            name: "Code Master",
            description: "Solve 50 problems",
            earned: stats.problems_solved >= badges::MANY_PROBLEMS,
        },
        BadgeResponse {
            id: "optimization-5",
            kind: "optimization",
            name: "Optimizer",
            description: "Submit 5 optimized solutions",
            earned: stats.optimized_solutions >= badges::OPTIMIZER_SOLUTIONS,
        },
        BadgeResponse {
            id: "achievement-top10",
            kind: "achievement",
            name: "Top 10",
            description: "Reach the top 10 on the leaderboard",
            earned: in_top,
        },
    ]
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{db::InMemoryStore, test_utils::fixtures, utils::parse_date};

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_longest_run() {
        let days: BTreeSet<NaiveDate> = [
            "2025-03-01",
            "2025-03-02",
            "2025-03-03",
            "2025-03-05",
            "2025-03-06",
        ]
        .into_iter()
        .map(day)
        .collect();

        assert_eq!(longest_run(&days), 3);
        assert_eq!(longest_run(&BTreeSet::new()), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemoryStore::new();

        assert!(matches!(
            UserService::get_by_username(&store, "nobody").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            UserService::stats(&store, "nobody").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_without_entry_are_zero() {
        let store = InMemoryStore::new();
        fixtures::user(&store, "u1", "ada", false).await;

        let stats = UserService::stats(&store, "ada").await.unwrap();

        assert_eq!(stats.total_points, 0.0);
        assert_eq!(stats.problems_solved, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.rank, None);

        let badges = UserService::badges(&store, "ada").await.unwrap();
        assert_eq!(badges.len(), 6);
        assert!(badges.iter().all(|b| !b.earned));
    }

    #[tokio::test]
    async fn test_stats_combine_entry_and_history() {
        let store = InMemoryStore::new();
        fixtures::user(&store, "u1", "ada", false).await;
        fixtures::entry(&store, "u2", "grace", 50.0, false).await;

        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        for i in 0..7 {
            let mut submission =
                fixtures::submission(&format!("s{i}"), "u1", "p1", start + Duration::days(i));
            submission.status = SubmissionStatus::Accepted;
            submission.points = 3.0;
            submission.is_optimized = i < 5;
            submission.reviewed_at = Some(start + Duration::days(i));
            fixtures::save_submission(&store, &submission).await;
        }
        let mut entry = fixtures::entry(&store, "u1", "ada", 21.0, false).await;
        entry.problems_solved = 7;
        entry.streak = 7;
        LeaderboardRepository::replace_if_version(&store, 1, &entry).await.unwrap();

        let stats = UserService::stats(&store, "ada").await.unwrap();

        assert_eq!(stats.total_points, 21.0);
        assert_eq!(stats.problems_solved, 7);
        assert_eq!(stats.current_streak, 7);
        assert_eq!(stats.longest_streak, 7);
        assert_eq!(stats.optimized_solutions, 5);
        assert_eq!(stats.rank, Some(2));

        let earned: Vec<&str> = badges_for(&stats)
            .into_iter()
            .filter(|b| b.earned)
            .map(|b| b.id)
            .collect();
        assert_eq!(earned, ["streak-7", "optimization-5", "achievement-top10"]);
    }
}
