//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use arena::domain::repository::{ChallengeRepository, SubmissionRepository};
use arena::{CacheConfig, ChallengeCache, MemoryArenaRepository, SupabaseArenaRepository, arena_router};
use auth::domain::repository::{AuthGateway, ProfileRepository};
use auth::gate::RouteTable;
use auth::{AuthConfig, MemoryAuthRepository, SessionStore, SupabaseAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use platform::rest::RestClient;
use platform::storage::{FileStore, KeyValueStore};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ArenaConfig, Backend};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                //.unwrap_or_else(|_| "api=debug,auth=debug,arena=debug,tower_http=debug".into()),
                .unwrap_or_else(|_| "api=info,auth=info,arena=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ArenaConfig::from_env()?;

    // Durable storage for the session and accepted challenges
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.storage_dir.clone())?);
    tracing::info!(dir = %config.storage_dir.display(), "Opened local storage");

    match &config.backend {
        Backend::Hosted(rest) => {
            // One client, so the arena tables see the signed-in user's token
            let client = RestClient::new(rest)?;
            tracing::info!(backend = %rest.base_url, "Using hosted backend");

            let auth_repo = Arc::new(SupabaseAuthRepository::new(
                client.clone(),
                Arc::clone(&storage),
                Arc::new(AuthConfig::default()),
            ));
            let arena_repo = Arc::new(SupabaseArenaRepository::new(client));
            serve(&config, auth_repo, arena_repo, storage, CacheConfig::default()).await
        }
        Backend::Offline => {
            tracing::warn!("ARENA_OFFLINE is set, using in-memory repositories");
            serve(
                &config,
                Arc::new(MemoryAuthRepository::new()),
                Arc::new(MemoryArenaRepository::new()),
                storage,
                CacheConfig::default(),
            )
            .await
        }
    }
}

/// Build both services once, mount their routers and run until Ctrl-C
async fn serve<A, R>(
    config: &ArenaConfig,
    auth_repo: Arc<A>,
    arena_repo: Arc<R>,
    storage: Arc<dyn KeyValueStore>,
    cache_config: CacheConfig,
) -> anyhow::Result<()>
where
    A: AuthGateway + ProfileRepository + Send + Sync + 'static,
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let sessions = SessionStore::new(auth_repo);
    let _session_task = sessions.start();

    let cache = ChallengeCache::new(
        arena_repo,
        storage,
        sessions.subscribe(),
        cache_config.with_refresh_interval(config.refresh_interval),
    );
    // Dropping the handle stops the refresh ticker
    let _cache_tasks = cache.start();

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(Arc::clone(&sessions), RouteTable::standard()),
        )
        .nest("/api/arena", arena_router(cache, sessions))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins));

    // Start server
    tracing::info!("Listening on {}", config.listen_addr);

    let listener = TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers(ExposeHeaders::list([
            header::RETRY_AFTER,
            HeaderName::from_static("x-auth-required"),
        ]))
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
