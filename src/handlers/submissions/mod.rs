//! Submission handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{Router, middleware, routing::post};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Submission routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_submission))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
