use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorbook_ai::{AiConfig, AiGateway};
use colorbook_api::config::ServerConfig;
use colorbook_api::router::build_app_router;
use colorbook_api::state::AppState;
use colorbook_pipeline::Generator;
use colorbook_social::{AutoPoster, RedditClient, RedditConfig};
use colorbook_storage::{S3ObjectStore, StorageConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorbook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        service_key = config.service_key_hash.is_some(),
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = colorbook_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    colorbook_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    colorbook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let gateway =
        Arc::new(AiGateway::new(&AiConfig::from_env()).expect("Failed to build AI client"));
    let store = Arc::new(S3ObjectStore::from_config(&StorageConfig::from_env()).await);
    let reddit = Arc::new(
        RedditClient::new(RedditConfig::from_env()).expect("Failed to build Reddit client"),
    );
    tracing::info!("External service clients created");

    // --- App state ---
    let generator = Generator::new(pool.clone(), gateway.clone(), gateway.clone(), store);
    let auto_poster = AutoPoster::new(pool.clone(), gateway, reddit);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator: Arc::new(generator),
        auto_poster: Arc::new(auto_poster),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // In-flight series requests may run for minutes; once a signal arrives
    // the drain is bounded by SHUTDOWN_TIMEOUT_SECS.
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let (drain_tx, mut drain_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = drain_tx.send(true);
        })
        .into_future();

    let drain_deadline = async move {
        let _ = drain_rx.wait_for(|draining| *draining).await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(timeout_secs = shutdown_timeout.as_secs(), "Shutdown drain timed out");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
