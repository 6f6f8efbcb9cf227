use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use kindergarten_rbac::{
    app::build_app,
    cache::{warmer, MemoryRouteCache, RouteCache},
    cli::Args,
    config,
    database::{DatabaseManager, PermissionStore, PgPermissionStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.apply(config::config().clone());
    tracing::info!("Starting kindergarten RBAC in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    let database = DatabaseManager::connect_lazy(&config.database).context("failed to create database pool")?;
    let store: Arc<dyn PermissionStore> = Arc::new(PgPermissionStore::new(
        database.pool().clone(),
        Duration::from_millis(config.database.slow_query_threshold_ms),
    ));
    let cache: Arc<dyn RouteCache> = Arc::new(MemoryRouteCache::new(Duration::from_secs(
        config.cache.stale_after_secs,
    )));

    let warmer = if config.cache.enabled {
        Some(warmer::spawn(
            store.clone(),
            cache.clone(),
            Duration::from_secs(config.cache.refresh_interval_secs),
        ))
    } else {
        tracing::warn!("Route cache disabled, every request queries the database");
        None
    };

    let state = AppState::new(store, cache, config.security.clone()).with_cache_enabled(config.cache.enabled);
    let app = build_app(state, &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = warmer {
        handle.abort();
    }
    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
