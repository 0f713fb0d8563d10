use std::time::Duration;

use anyhow::Result;
use petworld_core::config::{AppConfig, LoadOptions};
use petworld_server::{bootstrap, health, web};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use petworld_core::config::LogFormat::*;

    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.db_pool.clone(),
        app.config.llm.model.clone(),
    )
    .await?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        model = %app.config.llm.model,
        max_iterations = app.config.refinement.max_iterations,
        "petworld-server listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let server = axum::serve(listener, web::router(app.chat.clone(), app.templates.clone()))
        .with_graceful_shutdown(wait_for_shutdown());

    server.await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "petworld-server stopping"
    );

    if tokio::time::timeout(grace, app.db_pool.close()).await.is_err() {
        tracing::warn!(
            event_name = "system.server.pool_close_timeout",
            correlation_id = "shutdown",
            "database pool did not close within the grace period"
        );
    }

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for shutdown signal"
        );
    }
}
