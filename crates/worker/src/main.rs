use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorbook_ai::{AiConfig, AiGateway};
use colorbook_social::{AutoPoster, RedditClient, RedditConfig};
use colorbook_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorbook_worker=debug,colorbook_social=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = colorbook_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    colorbook_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection pool created");

    let gateway = Arc::new(AiGateway::new(&AiConfig::from_env()).context("Failed to build AI client")?);
    let reddit =
        Arc::new(RedditClient::new(RedditConfig::from_env()).context("Failed to build Reddit client")?);
    let poster = Arc::new(AutoPoster::new(pool, gateway, reddit));

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(colorbook_worker::run(poster, config, cancel.clone()));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, waiting for the current pass");
    cancel.cancel();
    worker.await.context("Auto-post worker panicked")?;

    tracing::info!("Worker shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
