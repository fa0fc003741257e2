//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Configuration is loaded once in `main` and handed to [`AppState`](crate::state::AppState);
//! nothing reads the environment after startup.

use std::env;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub request_timeout_secs: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which document store backend to run against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { url: String, max_connections: u32 },
}

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Redis configuration (optional; enables rate limiting and session revocation)
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: Option<String>,
}

/// JWT session configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// GitHub OAuth application credentials
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            store: StoreConfig::from_env()?,
            redis: RedisConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            github: GithubConfig::from_env()?,
        })
    }

    /// Configuration suitable for tests: in-memory store, no redis.
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: 0,
                rust_log: "debug".to_string(),
                log_format: LogFormat::Pretty,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            redis: RedisConfig { url: None },
            jwt: JwtConfig {
                secret: "test_secret_key_for_testing_only".to_string(),
                expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            },
            github: GithubConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_url: "http://localhost:8080/api/v1/auth/github/callback".to_string(),
            },
        }
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default())?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
                max_connections: parse_var(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
            },
            _ => return Err(ConfigError::InvalidValue("STORE_BACKEND".to_string())),
        };

        Ok(Self { backend })
    }
}

impl RedisConfig {
    fn from_env() -> Self {
        Self {
            url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
        }
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
        })
    }
}

impl GithubConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: env::var("GITHUB_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_ID".to_string()))?,
            client_secret: env::var("GITHUB_CLIENT_SECRET")
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_SECRET".to_string()))?,
            redirect_url: env::var("GITHUB_REDIRECT_URL")
                .map_err(|_| ConfigError::Missing("GITHUB_REDIRECT_URL".to_string()))?,
        })
    }
}

fn parse_var<T: std::str::FromStr + ToString>(name: &str, default: T) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
