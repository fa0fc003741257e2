//! Dailyboard - Application Entry Point
//!
//! This is the main entry point for the Dailyboard server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::middleware;
use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dailyboard::{
    config::{Config, LogFormat},
    constants::MAX_REQUEST_BODY_BYTES,
    create_router,
    db,
    identity::GithubIdentityProvider,
    middleware::rate_limit_middleware,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Dailyboard server...");

    // Document store
    let store = db::connection::connect_store(&config.store).await?;

    // Redis is optional: without it sessions are not revocable and requests
    // are not rate limited.
    let redis = match config.redis.url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to Redis...");
            let client = RedisClient::open(url)?;
            Some(redis::aio::ConnectionManager::new(client).await?)
        }
        None => {
            tracing::warn!("REDIS_URL not set; session revocation and rate limiting disabled");
            None
        }
    };
    let rate_limited = redis.is_some();

    let identity = GithubIdentityProvider::new(config.github.clone())?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState::new(store, Arc::new(identity), redis, config);

    // Build the router
    let mut app = create_router(state.clone());
    if rate_limited {
        app = app.layer(middleware::from_fn_with_state(state, rate_limit_middleware));
    }
    let app = app
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start the server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
