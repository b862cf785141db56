use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgRepository};

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let prefix = config.server.api_prefix.clone();
    let state = AppState::new(config, Arc::new(PgRepository::new(pool.clone())));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}{}", bind_addr, prefix);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
