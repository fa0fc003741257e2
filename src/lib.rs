//! Dailyboard - Daily Coding-Challenge Leaderboard
//!
//! This library provides the core functionality for the Dailyboard service:
//! admins schedule one problem per day, users submit pull requests as
//! solutions, admins review them, and a leaderboard ranks users by points.
//!
//! # Features
//!
//! - GitHub OAuth sign-in with JWT sessions
//! - Submission review with compare-and-swap leaderboard updates
//! - Leaderboard rebuild from submission history
//! - Daily streaks, profile statistics and badges
//! - In-memory or PostgreSQL (JSONB) document storage
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Typed access to document collections
//! - **Store**: The `DocumentStore` boundary and its backends

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

use axum::Router;
use tower_http::trace::TraceLayer;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the API router with request logging and tracing
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest(constants::API_BASE_PATH, handlers::routes(state.clone()))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
