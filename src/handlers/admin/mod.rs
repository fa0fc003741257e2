//! Admin handlers
//!
//! Every route requires a session with the admin flag.

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handler::get_stats))
        // Problem scheduling
        .route(
            "/problems",
            get(handler::list_problems).post(handler::create_problem),
        )
        .route(
            "/problems/{id}",
            put(handler::update_problem).delete(handler::delete_problem),
        )
        // Review queue
        .route("/submissions/pending", get(handler::list_pending_submissions))
        .route("/submissions/{id}/approve", post(handler::approve_submission))
        .route("/submissions/{id}/reject", post(handler::reject_submission))
        .route("/leaderboard/{user_id}/rebuild", post(handler::rebuild_leaderboard_entry))
        // User management
        .route("/users", get(handler::list_users))
        .route("/users/{id}/role", put(handler::update_user_role))
        .route("/users/{id}/ban", post(handler::ban_user))
        .route("/users/{id}/unban", post(handler::unban_user))
}
