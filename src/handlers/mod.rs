//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod problems;
pub mod submissions;
pub mod users;

use axum::{Router, middleware};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/problems", problems::routes(state.clone()))
        .nest("/submissions", submissions::routes(state.clone()))
        .nest("/leaderboard", leaderboard::routes())
        .nest("/users", users::routes())
        .nest(
            "/admin",
            admin::routes().route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    use crate::{
        db::repositories::{LeaderboardRepository, SubmissionRepository},
        identity::{Identity, MockIdentityProvider},
        models::{Role, SubmissionStatus},
        services::AdminService,
        test_utils::{
            fixtures,
            test_app::{authed, bearer, create_test_app, create_test_app_with_identity, get, json_body, send},
        },
        utils::{format_date, today_utc},
    };

    #[tokio::test]
    async fn test_health_reports_store() {
        let (app, _, _) = create_test_app();

        let response = send(&app, get("/api/v1/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "up");
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_session() {
        let (app, state, store) = create_test_app();
        let member = fixtures::user(store.as_ref(), "u1", "ada", false).await;

        let anonymous = send(&app, get("/api/v1/admin/stats")).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &app,
            authed("GET", "/api/v1/admin/stats", &bearer(&state, &member), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"]["code"], "FORBIDDEN");

        let garbage = send(&app, authed("GET", "/api/v1/admin/stats", "Bearer nope", None)).await;
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_review_flow_over_http() {
        let (app, state, store) = create_test_app();
        let admin = fixtures::admin(store.as_ref(), "a1", "root").await;
        fixtures::user(store.as_ref(), "u1", "ada", false).await;
        fixtures::pending_submission(store.as_ref(), "s1", "u1", "p1", Utc::now()).await;
        let auth = bearer(&state, &admin);

        let queue = send(&app, authed("GET", "/api/v1/admin/submissions/pending", &auth, None)).await;
        assert_eq!(queue.status(), StatusCode::OK);
        assert_eq!(json_body(queue).await.as_array().unwrap().len(), 1);

        let approved = send(
            &app,
            authed(
                "POST",
                "/api/v1/admin/submissions/s1/approve",
                &auth,
                Some(json!({ "isOptimized": true })),
            ),
        )
        .await;
        assert_eq!(approved.status(), StatusCode::OK);
        let body = json_body(approved).await;
        assert_eq!(body["submission"]["status"], "accepted");
        assert_eq!(body["submission"]["points"], 3.0);
        assert_eq!(body["leaderboardEntry"]["problemsSolved"], 1);

        let again = send(
            &app,
            authed("POST", "/api/v1/admin/submissions/s1/approve", &auth, None),
        )
        .await;
        assert_eq!(again.status(), StatusCode::CONFLICT);

        let entry = LeaderboardRepository::find(store.as_ref(), "u1").await.unwrap().unwrap();
        assert_eq!(entry.data.points, 3.0);

        let board = send(&app, get("/api/v1/leaderboard/preview")).await;
        let body = json_body(board).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["entries"][0]["rank"], 1);
        assert_eq!(body["entries"][0]["username"], "ada");
    }

    #[tokio::test]
    async fn test_revoked_admin_role_applies_to_live_sessions() {
        let (app, state, store) = create_test_app();
        let admin = fixtures::admin(store.as_ref(), "a1", "root").await;
        fixtures::user(store.as_ref(), "u1", "ada", false).await;
        fixtures::pending_submission(store.as_ref(), "s1", "u1", "p1", Utc::now()).await;
        let auth = bearer(&state, &admin);

        AdminService::update_role(store.as_ref(), "a1", Role::Admin, false)
            .await
            .unwrap();

        let response = send(
            &app,
            authed("POST", "/api/v1/admin/submissions/s1/approve", &auth, None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let submission = SubmissionRepository::find_by_id(store.as_ref(), "s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.data.status, SubmissionStatus::Pending);
        assert!(LeaderboardRepository::find(store.as_ref(), "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_banned_admin_is_locked_out() {
        let (app, state, store) = create_test_app();
        let admin = fixtures::admin(store.as_ref(), "a1", "root").await;
        let auth = bearer(&state, &admin);

        AdminService::set_banned(store.as_ref(), "a1", true).await.unwrap();

        let response = send(&app, authed("GET", "/api/v1/admin/stats", &auth, None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_leaderboard_filter_from_query() {
        let (app, _, store) = create_test_app();
        fixtures::entry(store.as_ref(), "u1", "ada", 4.0, true).await;
        fixtures::entry(store.as_ref(), "u2", "grace", 9.0, false).await;

        let body = json_body(send(&app, get("/api/v1/leaderboard?filter=techtronica")).await).await;

        assert_eq!(body["total"], 1);
        assert_eq!(body["entries"][0]["userId"], "u1");
    }

    #[tokio::test]
    async fn test_submit_and_see_it_on_profile() {
        let (app, state, store) = create_test_app();
        let user = fixtures::user(store.as_ref(), "u1", "ada", false).await;
        let today = format_date(today_utc());
        fixtures::problem(store.as_ref(), "p1", &today).await;
        let auth = bearer(&state, &user);

        let created = send(
            &app,
            authed(
                "POST",
                "/api/v1/submissions",
                &auth,
                Some(json!({
                    "problemId": "p1",
                    "pullRequestUrl": "https://github.com/acme/daily/pull/9"
                })),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(json_body(created).await["status"], "pending");

        let invalid = send(
            &app,
            authed(
                "POST",
                "/api/v1/submissions",
                &auth,
                Some(json!({ "problemId": "p1", "pullRequestUrl": "not a url" })),
            ),
        )
        .await;
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let submissions = json_body(send(&app, get("/api/v1/users/ada/submissions")).await).await;
        assert_eq!(submissions.as_array().unwrap().len(), 1);
        assert_eq!(submissions[0]["problemTitle"], "Problem p1");

        let daily = json_body(send(&app, get("/api/v1/problems/daily")).await).await;
        assert_eq!(daily["problem"]["id"], "p1");

        let listed = send(
            &app,
            authed("GET", "/api/v1/problems?window=week", &auth, None),
        )
        .await;
        let listed = json_body(listed).await;
        assert_eq!(listed["problems"][0]["solved"], false);

        let anonymous = json_body(send(&app, get("/api/v1/problems")).await).await;
        assert!(anonymous["problems"][0].get("solved").is_none());
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let (app, _, _) = create_test_app();

        let response = send(&app, get("/api/v1/users/nobody/stats")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_oauth_round_trip() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_authorize_url()
            .returning(|state| format!("https://github.com/login/oauth/authorize?state={state}"));
        provider.expect_exchange_code().returning(|_| {
            Ok(Identity {
                id: "gh-7".to_string(),
                display_name: Some("Linus T".to_string()),
                email: None,
                photo_url: None,
            })
        });
        let (app, _, _) = create_test_app_with_identity(provider);

        let started = json_body(send(&app, get("/api/v1/auth/github")).await).await;
        let state = started["state"].as_str().unwrap().to_string();

        let callback = send(
            &app,
            get(&format!("/api/v1/auth/github/callback?code=abc&state={state}")),
        )
        .await;
        assert_eq!(callback.status(), StatusCode::OK);
        let session = json_body(callback).await;
        assert_eq!(session["user"]["username"], "linust");
        let token = session["accessToken"].as_str().unwrap();

        let me = send(
            &app,
            authed("GET", "/api/v1/auth/me", &format!("Bearer {token}"), None),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(json_body(me).await["sub"], "gh-7");

        let signed_out = send(
            &app,
            authed("POST", "/api/v1/auth/signout", &format!("Bearer {token}"), None),
        )
        .await;
        assert_eq!(json_body(signed_out).await["revoked"], false);
    }
}
