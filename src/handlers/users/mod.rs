//! Public user profile handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(handler::get_profile))
        .route("/{username}/submissions", get(handler::list_user_submissions))
        .route("/{username}/stats", get(handler::get_user_stats))
        .route("/{username}/badges", get(handler::get_user_badges))
}
