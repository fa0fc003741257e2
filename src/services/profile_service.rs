//! Profile resolution on sign-in
//!
//! Maps an identity to the stored user, creating one on first sign-in.
//! Sign-in never fails because of the profile store.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    db::{DocumentStore, repositories::UserRepository},
    error::AppResult,
    identity::Identity,
    models::User,
    utils::synthesize_username,
};

/// Result of resolving a signed-in identity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "profile", rename_all = "camelCase")]
pub enum ResolvedProfile {
    /// The stored (or freshly created) user
    Profile(User),
    /// The store could not be reached; only the identity is known
    Bare(Identity),
}

impl ResolvedProfile {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Profile(user) => Some(user),
            Self::Bare(_) => None,
        }
    }
}

/// Profile service
pub struct ProfileService;

impl ProfileService {
    /// Find or create the user for an identity, falling back to the bare
    /// identity on any store failure.
    pub async fn resolve(store: &dyn DocumentStore, identity: Identity) -> ResolvedProfile {
        match Self::find_or_create(store, &identity).await {
            Ok(user) => ResolvedProfile::Profile(user),
            Err(e) => {
                warn!(
                    identity_id = %identity.id,
                    error = %e,
                    "Profile resolution failed; continuing with bare identity"
                );
                ResolvedProfile::Bare(identity)
            }
        }
    }

    async fn find_or_create(store: &dyn DocumentStore, identity: &Identity) -> AppResult<User> {
        if let Some(user) = UserRepository::find_by_id(store, &identity.id).await? {
            return Ok(user);
        }

        let now = Utc::now();
        let user = User {
            id: identity.id.clone(),
            username: synthesize_username(identity.display_name.as_deref(), now),
            email: identity.email.clone().unwrap_or_default(),
            display_name: identity.display_name.clone().unwrap_or_default(),
            photo_url: identity.photo_url.clone().unwrap_or_default(),
            is_admin: false,
            is_techtronica: false,
            is_banned: false,
            joined_at: now,
        };

        let user = UserRepository::create(store, &user).await?;
        info!(user_id = %user.id, username = %user.username, "New user created on first sign-in");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::InMemoryStore,
        test_utils::{FailingStore, fixtures},
    };

    fn identity(id: &str, display_name: Option<&str>) -> Identity {
        Identity {
            id: id.to_string(),
            display_name: display_name.map(str::to_string),
            email: Some("dev@example.com".to_string()),
            photo_url: Some("https://avatars.example/dev".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_sign_in_creates_user() {
        let store = InMemoryStore::new();

        let resolved = ProfileService::resolve(&store, identity("gh-1", Some("Ada Lovelace"))).await;

        let user = resolved.user().unwrap();
        assert_eq!(user.username, "adalovelace");
        assert_eq!(user.email, "dev@example.com");
        assert!(!user.is_admin);
        assert!(!user.is_techtronica);
        assert!(!user.is_banned);
        assert!(UserRepository::find_by_id(&store, "gh-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_existing_user_is_returned_unchanged() {
        let store = InMemoryStore::new();
        fixtures::user(&store, "gh-1", "original", true).await;

        let resolved = ProfileService::resolve(&store, identity("gh-1", Some("Renamed Person"))).await;

        let user = resolved.user().unwrap();
        assert_eq!(user.username, "original");
        assert!(user.is_techtronica);
        assert_eq!(store.count("users").await, 1);
    }

    #[tokio::test]
    async fn test_missing_display_name_gets_fallback_username() {
        let store = InMemoryStore::new();

        let resolved = ProfileService::resolve(&store, identity("gh-2", None)).await;

        let username = &resolved.user().unwrap().username;
        assert!(username.starts_with("user"));
        assert_eq!(username.len(), "user".len() + 6);
    }

    #[tokio::test]
    async fn test_colliding_usernames_are_not_deduplicated() {
        let store = InMemoryStore::new();

        let first = ProfileService::resolve(&store, identity("gh-1", Some("Sam"))).await;
        let second = ProfileService::resolve(&store, identity("gh-2", Some("sam"))).await;

        assert_eq!(first.user().unwrap().username, "sam");
        assert_eq!(second.user().unwrap().username, "sam");
        assert_eq!(store.count("users").await, 2);
    }

    #[tokio::test]
    async fn test_store_failure_falls_back_to_bare_identity() {
        let store = FailingStore;
        let id = identity("gh-3", Some("Grace"));

        let resolved = ProfileService::resolve(&store, id.clone()).await;

        assert_eq!(resolved, ResolvedProfile::Bare(id));
    }
}
