//! GitHub OAuth identity provider

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Deserialize;

use crate::{config::GithubConfig, constants::github};

use super::{Identity, IdentityError, IdentityProvider};

/// GitHub OAuth app client
#[derive(Debug, Clone)]
pub struct GithubIdentityProvider {
    http: Client,
    config: GithubConfig,
    authorize_base: Url,
    api_base: Url,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted {
        access_token: String,
    },
    Failed {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

impl GithubIdentityProvider {
    pub fn new(config: GithubConfig) -> Result<Self, IdentityError> {
        let http = Client::builder()
            .user_agent(github::USER_AGENT)
            .build()?;

        let authorize_base = Url::parse(github::AUTHORIZE_URL)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
        let api_base = Url::parse(github::API_BASE_URL)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            http,
            config,
            authorize_base,
            api_base,
        })
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, IdentityError> {
        let response: TokenResponse = self
            .http
            .post(github::TOKEN_URL)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response {
            TokenResponse::Granted { access_token } => Ok(access_token),
            TokenResponse::Failed {
                error,
                error_description,
            } => Err(IdentityError::Rejected(
                error_description.unwrap_or(error),
            )),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GithubUser, IdentityError> {
        let url = self
            .api_base
            .join("user")
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        let user = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl IdentityProvider for GithubIdentityProvider {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize_base.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("scope", github::SCOPES)
            .append_pair("state", state);
        url.into()
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, IdentityError> {
        let access_token = self.fetch_access_token(code).await?;
        let user = self.fetch_user(&access_token).await?;

        tracing::debug!(github_id = user.id, login = %user.login, "Fetched GitHub identity");

        Ok(Identity {
            id: user.id.to_string(),
            display_name: user.name.filter(|name| !name.trim().is_empty()),
            email: user.email,
            photo_url: user.avatar_url,
        })
    }
}
