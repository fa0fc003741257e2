//! Problem handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{Router, middleware, routing::get};

use crate::{middleware::auth::optional_auth_middleware, state::AppState};

/// Problem routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_problems))
        .route("/daily", get(handler::get_daily_problem))
        .route_layer(middleware::from_fn_with_state(state, optional_auth_middleware))
}
