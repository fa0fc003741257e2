//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor. Every service call
//! receives its collaborators from here; there are no global singletons.

use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::{config::Config, db::DocumentStore, identity::IdentityProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Document store backend
    store: Arc<dyn DocumentStore>,

    /// OAuth identity provider
    identity: Arc<dyn IdentityProvider>,

    /// Redis connection manager, when configured
    redis: Option<ConnectionManager>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        redis: Option<ConnectionManager>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                identity,
                redis,
                config,
            }),
        }
    }

    /// Get a reference to the document store
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the identity provider
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get a clone of the Redis connection manager, if configured
    pub fn redis(&self) -> Option<ConnectionManager> {
        self.inner.redis.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
