//! Business logic services
//!
//! Services are stateless; each call receives the store (and any other
//! collaborator) explicitly.

pub mod admin_service;
pub mod auth_service;
pub mod leaderboard_service;
pub mod problem_service;
pub mod profile_service;
pub mod review_service;
pub mod submission_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::{AuthService, Claims};
pub use leaderboard_service::LeaderboardService;
pub use problem_service::ProblemService;
pub use profile_service::{ProfileService, ResolvedProfile};
pub use review_service::{ReviewOutcome, ReviewService};
pub use submission_service::SubmissionService;
pub use user_service::UserService;
