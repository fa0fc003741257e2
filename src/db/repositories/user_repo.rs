//! User repository

use serde_json::{Map, Value};

use crate::{
    constants::collections::USERS,
    db::{Direction, DocumentStore, Predicate, Query, StoreError, document::encode},
    error::{AppError, AppResult},
    models::User,
};

use super::{decode_all, find_many};

/// Repository for user documents
pub struct UserRepository;

impl UserRepository {
    /// Create a new user; the identity id must not be taken
    pub async fn create(store: &dyn DocumentStore, user: &User) -> AppResult<User> {
        let doc = store.create(USERS, &user.id, encode(user)?).await?;
        Ok(doc.decode()?)
    }

    /// Find user by ID
    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> AppResult<Option<User>> {
        let doc = store.get(USERS, id).await?;
        Ok(doc.map(|d| d.decode()).transpose()?)
    }

    /// Find user by username. Usernames are not de-duplicated, so this is
    /// the first match in store order.
    pub async fn find_by_username(
        store: &dyn DocumentStore,
        username: &str,
    ) -> AppResult<Option<User>> {
        let docs = store
            .query(
                USERS,
                &Query::new()
                    .filter(Predicate::eq("username", username))
                    .limit(1),
            )
            .await?;

        Ok(docs.first().map(|d| d.decode()).transpose()?)
    }

    /// Find several users by ID
    pub async fn find_by_ids<I, S>(store: &dyn DocumentStore, ids: I) -> AppResult<Vec<User>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        find_many(store, USERS, ids).await
    }

    /// Set one boolean flag (`isAdmin`, `isTechtronica`, `isBanned`)
    pub async fn set_flag(
        store: &dyn DocumentStore,
        id: &str,
        field: &str,
        value: bool,
    ) -> AppResult<User> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), Value::Bool(value));

        let doc = store.update(USERS, id, fields).await.map_err(|e| match e {
            StoreError::NotFound { .. } => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

        Ok(doc.decode()?)
    }

    /// List users, newest first
    pub async fn list(store: &dyn DocumentStore) -> AppResult<Vec<User>> {
        let docs = store
            .query(
                USERS,
                &Query::new().order_by("joinedAt", Direction::Descending),
            )
            .await?;

        decode_all(&docs)
    }

    /// Count users
    pub async fn count(store: &dyn DocumentStore) -> AppResult<usize> {
        Ok(store.query(USERS, &Query::new()).await?.len())
    }
}
