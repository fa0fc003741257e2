//! Authentication service
//!
//! OAuth sign-in against the identity provider, followed by a stateless JWT
//! session. Sign-out revokes the session's token id in redis when redis is
//! configured.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    constants::OAUTH_STATE_TTL_SECS,
    db::DocumentStore,
    error::{AppError, AppResult},
    handlers::auth::response::{SessionResponse, SessionUser, SignInResponse},
    identity::IdentityProvider,
    services::{ProfileService, ResolvedProfile},
    utils::{generate_nonce, synthesize_username},
};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // identity id
    pub username: String,
    pub is_admin: bool,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of the short-lived OAuth `state` token
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    nonce: String,
    iat: i64,
    exp: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Start an OAuth sign-in
    pub fn begin_sign_in(
        identity: &dyn IdentityProvider,
        config: &Config,
    ) -> AppResult<SignInResponse> {
        let now = Utc::now();
        let claims = StateClaims {
            nonce: generate_nonce(16),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(OAUTH_STATE_TTL_SECS)).timestamp(),
        };
        let state = sign(&claims, &config.jwt.secret)?;

        Ok(SignInResponse {
            authorize_url: identity.authorize_url(&state),
            state,
        })
    }

    /// Finish an OAuth sign-in: check the `state`, exchange the code,
    /// resolve the profile and issue a session.
    pub async fn complete_sign_in(
        store: &dyn DocumentStore,
        identity: &dyn IdentityProvider,
        config: &Config,
        code: &str,
        state: &str,
    ) -> AppResult<SessionResponse> {
        decode::<StateClaims>(
            state,
            &DecodingKey::from_secret(config.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .inspect_err(|e| debug!(error = %e, "OAuth state rejected"))?;

        let signed_in = identity.exchange_code(code).await?;
        let profile = ProfileService::resolve(store, signed_in).await;

        let (access_token, claims) = Self::issue_token(&profile, config)?;
        info!(
            user_id = %claims.sub,
            username = %claims.username,
            profile_resolved = profile.user().is_some(),
            "User signed in"
        );

        Ok(SessionResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: config.jwt.expiry_hours * 3600,
            profile_resolved: profile.user().is_some(),
            user: session_user(profile, claims.username),
        })
    }

    /// Issue a session token for a resolved profile
    pub fn issue_token(profile: &ResolvedProfile, config: &Config) -> AppResult<(String, Claims)> {
        let now = Utc::now();
        let (sub, username, is_admin) = match profile {
            ResolvedProfile::Profile(user) => (user.id.clone(), user.username.clone(), user.is_admin),
            ResolvedProfile::Bare(identity) => (
                identity.id.clone(),
                identity
                    .display_name
                    .clone()
                    .unwrap_or_else(|| synthesize_username(None, now)),
                false,
            ),
        };

        let claims = Claims {
            sub,
            username,
            is_admin,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(config.jwt.expiry_hours)).timestamp(),
        };

        Ok((sign(&claims, &config.jwt.secret)?, claims))
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Revoke the session until it would have expired. Returns whether a
    /// revocation was recorded; without redis, sessions simply expire.
    pub async fn sign_out(redis: Option<ConnectionManager>, claims: &Claims) -> AppResult<bool> {
        let Some(mut redis) = redis else {
            debug!(user_id = %claims.sub, "No revocation store configured; session left to expire");
            return Ok(false);
        };

        let ttl = (claims.exp - Utc::now().timestamp()).max(1) as u64;
        redis
            .set_ex::<_, _, ()>(revocation_key(&claims.jti), "1", ttl)
            .await?;

        info!(user_id = %claims.sub, jti = %claims.jti, "Session revoked");
        Ok(true)
    }

    /// Whether a session token id has been revoked
    pub async fn is_revoked(redis: &mut ConnectionManager, jti: &str) -> AppResult<bool> {
        Ok(redis.exists(revocation_key(jti)).await?)
    }
}

fn revocation_key(jti: &str) -> String {
    format!("revoked_token:{jti}")
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
}

fn session_user(profile: ResolvedProfile, username: String) -> SessionUser {
    match profile {
        ResolvedProfile::Profile(user) => SessionUser {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            photo_url: user.photo_url,
            is_admin: user.is_admin,
            is_techtronica: user.is_techtronica,
        },
        ResolvedProfile::Bare(identity) => SessionUser {
            username,
            display_name: identity.display_name.unwrap_or_default(),
            photo_url: identity.photo_url.unwrap_or_default(),
            id: identity.id,
            is_admin: false,
            is_techtronica: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::InMemoryStore,
        identity::{Identity, IdentityError, MockIdentityProvider},
        test_utils::{FailingStore, fixtures},
    };

    fn github_identity() -> Identity {
        Identity {
            id: "gh-42".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            email: None,
            photo_url: Some("https://avatars.example/ada".to_string()),
        }
    }

    fn provider_granting(identity: Identity) -> MockIdentityProvider {
        let mut provider = MockIdentityProvider::new();
        provider.expect_exchange_code().returning(move |code| {
            if code == "good-code" {
                Ok(identity.clone())
            } else {
                Err(IdentityError::Rejected("bad_verification_code".to_string()))
            }
        });
        provider
    }

    #[test]
    fn test_begin_sign_in_embeds_signed_state() {
        let config = Config::for_tests();
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_authorize_url()
            .returning(|state| format!("https://github.com/login/oauth/authorize?state={state}"));

        let started = AuthService::begin_sign_in(&provider, &config).unwrap();

        assert!(started.authorize_url.ends_with(&started.state));
        // A state token is not a session token
        assert!(AuthService::verify_token(&started.state, &config.jwt.secret).is_err());
    }

    #[tokio::test]
    async fn test_sign_in_creates_user_and_session() {
        let config = Config::for_tests();
        let store = InMemoryStore::new();
        let provider = provider_granting(github_identity());
        let state = AuthService::begin_sign_in(&provider_with_url(), &config)
            .unwrap()
            .state;

        let session =
            AuthService::complete_sign_in(&store, &provider, &config, "good-code", &state)
                .await
                .unwrap();

        assert!(session.profile_resolved);
        assert_eq!(session.user.username, "adalovelace");
        assert_eq!(session.token_type, "Bearer");

        let claims = AuthService::verify_token(&session.access_token, &config.jwt.secret).unwrap();
        assert_eq!(claims.sub, "gh-42");
        assert_eq!(claims.username, "adalovelace");
        assert!(!claims.is_admin);
        assert_eq!(store.count("users").await, 1);
    }

    #[tokio::test]
    async fn test_admin_flag_flows_into_claims() {
        let config = Config::for_tests();
        let store = InMemoryStore::new();
        fixtures::admin(&store, "gh-42", "ada").await;
        let provider = provider_granting(github_identity());
        let state = AuthService::begin_sign_in(&provider_with_url(), &config)
            .unwrap()
            .state;

        let session =
            AuthService::complete_sign_in(&store, &provider, &config, "good-code", &state)
                .await
                .unwrap();

        let claims = AuthService::verify_token(&session.access_token, &config.jwt.secret).unwrap();
        assert!(claims.is_admin);
        assert_eq!(claims.username, "ada");
    }

    #[tokio::test]
    async fn test_sign_in_survives_store_outage() {
        let config = Config::for_tests();
        let provider = provider_granting(github_identity());
        let state = AuthService::begin_sign_in(&provider_with_url(), &config)
            .unwrap()
            .state;

        let session =
            AuthService::complete_sign_in(&FailingStore, &provider, &config, "good-code", &state)
                .await
                .unwrap();

        assert!(!session.profile_resolved);
        assert_eq!(session.user.username, "Ada Lovelace");
        assert!(!session.user.is_admin);
    }

    #[tokio::test]
    async fn test_forged_state_and_rejected_code() {
        let config = Config::for_tests();
        let store = InMemoryStore::new();
        let provider = provider_granting(github_identity());

        assert!(matches!(
            AuthService::complete_sign_in(&store, &provider, &config, "good-code", "forged").await,
            Err(AppError::InvalidToken)
        ));

        let state = AuthService::begin_sign_in(&provider_with_url(), &config)
            .unwrap()
            .state;
        assert!(matches!(
            AuthService::complete_sign_in(&store, &provider, &config, "stale-code", &state).await,
            Err(AppError::Unauthorized)
        ));
        assert_eq!(store.count("users").await, 0);
    }

    #[test]
    fn test_expired_and_foreign_tokens() {
        let config = Config::for_tests();
        let now = Utc::now();
        let expired = Claims {
            sub: "gh-1".to_string(),
            username: "ada".to_string(),
            is_admin: false,
            jti: "j1".to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = sign(&expired, &config.jwt.secret).unwrap();

        assert!(matches!(
            AuthService::verify_token(&token, &config.jwt.secret),
            Err(AppError::TokenExpired)
        ));

        let foreign = sign(
            &Claims {
                exp: (now + Duration::hours(1)).timestamp(),
                ..expired
            },
            "some-other-secret",
        )
        .unwrap();
        assert!(matches!(
            AuthService::verify_token(&foreign, &config.jwt.secret),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_without_redis_is_a_no_op() {
        let config = Config::for_tests();
        let profile = ResolvedProfile::Bare(github_identity());
        let (_, claims) = AuthService::issue_token(&profile, &config).unwrap();

        assert!(!AuthService::sign_out(None, &claims).await.unwrap());
    }

    fn provider_with_url() -> MockIdentityProvider {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_authorize_url()
            .returning(|state| format!("https://github.com/login/oauth/authorize?state={state}"));
        provider
    }
}
