//! CloudVote API server binary entrypoint.

use std::net::SocketAddr;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cloudvote_common::config::AppConfig;
use cloudvote_common::lifecycle::PoolLifecycle;
use cloudvote_common::pool::PoolConfig;

use cloudvote_api::routes::create_router;
use cloudvote_api::server::serve_until_shutdown;
use cloudvote_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("cloudvote_api=debug,cloudvote_common=debug,tower_http=debug")
    });
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting CloudVote API server...");

    // Load configuration
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let pool_config = PoolConfig::from_app_config(&config).context("Invalid pool configuration")?;

    // Create the connection pool and verify the schema; any failure aborts start-up
    let lifecycle = PoolLifecycle::new(pool_config);
    let pool = lifecycle
        .on_start()
        .await
        .context("Failed to initialize the database connection pool")?;
    tracing::info!("Database pool ready");

    // Build router
    let state = AppState::new(pool);
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server; the pool is stopped on every exit path
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let served = serve_until_shutdown(&lifecycle, addr, app, shutdown_signal()).await;
    tracing::info!("CloudVote API server stopped.");

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Received shutdown signal, stopping gracefully...");
}
