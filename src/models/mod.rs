//! Domain models
//!
//! This module contains all domain models used throughout the application.
//! Models are stored as camelCase documents; event timestamps are stored as
//! epoch milliseconds so they order correctly in queries.

pub mod leaderboard;
pub mod problem;
pub mod submission;
pub mod user;

pub use leaderboard::*;
pub use problem::*;
pub use submission::*;
pub use user::*;
