//! Test utilities: store fixtures, a store that is always down, and an
//! in-memory application for router tests.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::db::{Document, DocumentStore, Query, StoreError, StoreResult};

pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::{
        db::{
            DocumentStore,
            repositories::{LeaderboardRepository, ProblemRepository, SubmissionRepository, UserRepository},
        },
        models::{Difficulty, LeaderboardEntry, Problem, Submission, SubmissionStatus, User},
        utils::parse_date,
    };

    fn build_user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            display_name: username.to_string(),
            photo_url: format!("https://avatars.example/{username}"),
            is_admin: false,
            is_techtronica: false,
            is_banned: false,
            joined_at: Utc::now(),
        }
    }

    pub async fn user(
        store: &dyn DocumentStore,
        id: &str,
        username: &str,
        is_techtronica: bool,
    ) -> User {
        let user = User {
            is_techtronica,
            ..build_user(id, username)
        };
        UserRepository::create(store, &user).await.unwrap()
    }

    pub async fn admin(store: &dyn DocumentStore, id: &str, username: &str) -> User {
        let user = User {
            is_admin: true,
            ..build_user(id, username)
        };
        UserRepository::create(store, &user).await.unwrap()
    }

    pub async fn banned_user(store: &dyn DocumentStore, id: &str, username: &str) -> User {
        let user = User {
            is_banned: true,
            ..build_user(id, username)
        };
        UserRepository::create(store, &user).await.unwrap()
    }

    /// A problem titled `Problem {id}` scheduled on `date`
    pub async fn problem(store: &dyn DocumentStore, id: &str, date: &str) -> Problem {
        let problem = Problem {
            id: id.to_string(),
            title: format!("Problem {id}"),
            description: "Solve it.".to_string(),
            difficulty: Difficulty::Medium,
            category: "Arrays".to_string(),
            date: parse_date(date).unwrap(),
        };
        ProblemRepository::create(store, &problem).await.unwrap()
    }

    /// A pending submission, not yet stored
    pub fn submission(
        id: &str,
        user_id: &str,
        problem_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> Submission {
        Submission {
            id: id.to_string(),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            pull_request_url: format!("https://github.com/acme/daily/pull/{id}"),
            status: SubmissionStatus::Pending,
            points: 0.0,
            is_optimized: false,
            is_plagiarized: false,
            submitted_at,
            reviewed_at: None,
        }
    }

    pub async fn save_submission(store: &dyn DocumentStore, submission: &Submission) -> Submission {
        SubmissionRepository::create(store, submission).await.unwrap()
    }

    pub async fn pending_submission(
        store: &dyn DocumentStore,
        id: &str,
        user_id: &str,
        problem_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> Submission {
        save_submission(store, &submission(id, user_id, problem_id, submitted_at)).await
    }

    /// A submission already reviewed into `status`, bypassing the workflow
    pub async fn reviewed_submission(
        store: &dyn DocumentStore,
        id: &str,
        user_id: &str,
        problem_id: &str,
        status: SubmissionStatus,
        points: f64,
    ) -> Submission {
        let now = Utc::now();
        let submission = Submission {
            status,
            points,
            reviewed_at: Some(now),
            ..submission(id, user_id, problem_id, now)
        };
        save_submission(store, &submission).await
    }

    /// A leaderboard entry with three solved problems
    pub async fn entry(
        store: &dyn DocumentStore,
        user_id: &str,
        username: &str,
        points: f64,
        is_techtronica: bool,
    ) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            user_id: user_id.to_string(),
            username: username.to_string(),
            photo_url: String::new(),
            is_techtronica,
            points,
            problems_solved: 3,
            streak: 1,
            last_solved_on: None,
            last_updated: Utc::now(),
        };
        LeaderboardRepository::create(store, &entry).await.unwrap()
    }
}

/// A store whose backend is unreachable
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
        unavailable()
    }

    async fn set(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        unavailable()
    }

    async fn create(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        unavailable()
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        unavailable()
    }

    async fn update_if_version(
        &self,
        _collection: &str,
        _id: &str,
        _expected_version: u64,
        _fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        unavailable()
    }

    async fn delete(&self, _collection: &str, _id: &str) -> StoreResult<()> {
        unavailable()
    }

    async fn query(&self, _collection: &str, _query: &Query) -> StoreResult<Vec<Document>> {
        unavailable()
    }

    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }
}

pub mod test_app {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, Response, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{
        config::Config,
        create_router,
        db::{DocumentStore, InMemoryStore},
        identity::{IdentityProvider, MockIdentityProvider},
        models::User,
        services::{AuthService, ResolvedProfile},
        state::AppState,
    };

    /// In-memory application without redis; the identity provider refuses
    /// every call unless one is supplied.
    pub fn create_test_app() -> (Router, AppState, Arc<InMemoryStore>) {
        create_test_app_with_identity(MockIdentityProvider::new())
    }

    pub fn create_test_app_with_identity(
        identity: impl IdentityProvider + 'static,
    ) -> (Router, AppState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            store.clone() as Arc<dyn DocumentStore>,
            Arc::new(identity),
            None,
            Config::for_tests(),
        );
        (create_router(state.clone()), state, store)
    }

    /// Bearer header value for a session as `user`
    pub fn bearer(state: &AppState, user: &User) -> String {
        let (token, _) =
            AuthService::issue_token(&ResolvedProfile::Profile(user.clone()), state.config())
                .unwrap();
        format!("Bearer {token}")
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub fn authed(method: &str, uri: &str, auth: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, auth);

        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
        app.clone().oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
