//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache selection, the idle client sweeper,
//! and the Axum server lifecycle.

use crate::application::services::{CacheAsideResolver, ResolutionGateway};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::domain::client_registry::{ClientRegistry, run_client_sweeper};
use crate::infrastructure::cache::{CacheService, InMemoryCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or in-memory fallback)
/// - Client registry and its background sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let clock = Arc::new(SystemClock);

    let cache = select_cache(&config, clock.clone()).await;

    let link_repository = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let resolver = Arc::new(CacheAsideResolver::new(
        link_repository,
        cache.clone(),
        config.cache_ttl(),
    ));

    let registry = Arc::new(ClientRegistry::new(
        config.rate_limit_policy(),
        config.client_idle_timeout(),
        clock,
    ));
    let sweeper = tokio::spawn(run_client_sweeper(
        registry.clone(),
        config.client_sweep_interval(),
    ));
    tracing::info!("Client sweeper started");

    let gateway = Arc::new(ResolutionGateway::new(
        registry,
        resolver,
        Arc::new(RandomCodeGenerator),
    ));

    let state = AppState::new(gateway, cache, config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper.abort();
    tracing::info!("Client sweeper stopped");

    served?;
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Picks the cache backend: Redis when configured and reachable, otherwise a
/// bounded in-memory cache.
async fn select_cache(config: &Config, clock: Arc<SystemClock>) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-memory cache.", e);
            }
        }
    } else {
        tracing::info!("Redis not configured, using in-memory cache");
    }

    Arc::new(InMemoryCache::new(config.cache_max_entries, clock))
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
