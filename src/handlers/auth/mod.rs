//! Authentication handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Authentication routes
pub fn routes(state: AppState) -> Router<AppState> {
    let session = Router::new()
        .route("/me", get(handler::get_current_session))
        .route("/signout", post(handler::sign_out))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/github", get(handler::begin_github_sign_in))
        .route("/github/callback", get(handler::github_callback))
        .merge(session)
}
