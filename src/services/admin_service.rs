//! Admin service

use tracing::info;

use crate::{
    db::{
        DocumentStore,
        repositories::{LeaderboardRepository, ProblemRepository, SubmissionRepository, UserRepository},
    },
    error::AppResult,
    handlers::admin::response::AdminStatsResponse,
    models::{Role, SubmissionStatus, User},
};

/// Admin service for user and dashboard management
pub struct AdminService;

impl AdminService {
    /// All users, newest first
    pub async fn list_users(store: &dyn DocumentStore) -> AppResult<Vec<User>> {
        UserRepository::list(store).await
    }

    /// Grant or revoke a role. Membership is mirrored onto the user's
    /// leaderboard entry when one exists.
    pub async fn update_role(
        store: &dyn DocumentStore,
        user_id: &str,
        role: Role,
        value: bool,
    ) -> AppResult<User> {
        let user = UserRepository::set_flag(store, user_id, role.flag_field(), value).await?;

        if role == Role::Techtronica {
            let mirrored = LeaderboardRepository::set_membership(store, user_id, value).await?;
            info!(
                user_id,
                is_techtronica = value,
                entry_updated = mirrored.is_some(),
                "Membership changed"
            );
        } else {
            info!(user_id, role = %role, value, "Role changed");
        }

        Ok(user)
    }

    /// Ban or unban a user
    pub async fn set_banned(store: &dyn DocumentStore, user_id: &str, banned: bool) -> AppResult<User> {
        let user = UserRepository::set_flag(store, user_id, "isBanned", banned).await?;
        info!(user_id, banned, "Ban status changed");
        Ok(user)
    }

    /// Dashboard totals
    pub async fn stats(store: &dyn DocumentStore) -> AppResult<AdminStatsResponse> {
        let (total_users, total_problems, pending, accepted, rejected) = futures::try_join!(
            UserRepository::count(store),
            ProblemRepository::count(store),
            SubmissionRepository::count_by_status(store, SubmissionStatus::Pending),
            SubmissionRepository::count_by_status(store, SubmissionStatus::Accepted),
            SubmissionRepository::count_by_status(store, SubmissionStatus::Rejected),
        )?;

        Ok(AdminStatsResponse {
            total_users,
            total_problems,
            pending_submissions: pending,
            accepted_submissions: accepted,
            rejected_submissions: rejected,
        })
    }
}
