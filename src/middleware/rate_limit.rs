//! Rate limiting middleware
//!
//! Fixed-window counters in redis, keyed by client address and route group.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;
use tracing::warn;

use crate::{constants, error::AppError, state::AppState};

/// Rate limit middleware; a pass-through when redis is not configured
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(mut redis) = state.redis() else {
        return Ok(next.run(request).await);
    };

    let path = request.uri().path().to_string();
    let (limit, window) = get_rate_limit(&path);
    let key = format!("rate_limit:{}:{}", addr.ip(), path_bucket(&path));

    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Rate limit counter unavailable; allowing request");
            0
        }
    };

    if count == 1 {
        let _: () = redis.expire(&key, window).await.unwrap_or(());
    }

    if count > limit {
        warn!(ip = %addr.ip(), path = %path, count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Get rate limit for a path
fn get_rate_limit(path: &str) -> (i64, i64) {
    match path_bucket(path) {
        "auth" => (
            constants::rate_limits::AUTH_MAX_REQUESTS,
            constants::rate_limits::AUTH_WINDOW_SECS,
        ),
        "submissions" => (
            constants::rate_limits::SUBMISSION_MAX_REQUESTS,
            constants::rate_limits::SUBMISSION_WINDOW_SECS,
        ),
        "admin" => (
            constants::rate_limits::ADMIN_MAX_REQUESTS,
            constants::rate_limits::ADMIN_WINDOW_SECS,
        ),
        _ => (
            constants::rate_limits::GENERAL_MAX_REQUESTS,
            constants::rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

/// Get bucket for path (for grouping similar endpoints)
fn path_bucket(path: &str) -> &'static str {
    let path = path
        .strip_prefix(constants::API_BASE_PATH)
        .unwrap_or(path);

    if path.starts_with("/auth") {
        "auth"
    } else if path.starts_with("/submissions") {
        "submissions"
    } else if path.starts_with("/admin") {
        "admin"
    } else {
        "general"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_buckets() {
        assert_eq!(path_bucket("/api/v1/auth/github"), "auth");
        assert_eq!(path_bucket("/api/v1/submissions"), "submissions");
        assert_eq!(path_bucket("/api/v1/admin/stats"), "admin");
        assert_eq!(path_bucket("/api/v1/leaderboard"), "general");
        assert_eq!(
            get_rate_limit("/api/v1/auth/github"),
            (
                constants::rate_limits::AUTH_MAX_REQUESTS,
                constants::rate_limits::AUTH_WINDOW_SECS
            )
        );
    }

    #[test]
    fn test_admin_routes_have_their_own_limit() {
        assert_eq!(
            get_rate_limit("/api/v1/admin/submissions/s1/approve"),
            (
                constants::rate_limits::ADMIN_MAX_REQUESTS,
                constants::rate_limits::ADMIN_WINDOW_SECS
            )
        );
        assert_ne!(
            get_rate_limit("/api/v1/admin/stats"),
            get_rate_limit("/api/v1/leaderboard")
        );
    }
}
