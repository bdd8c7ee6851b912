//! Serving the router for the lifetime of the connection pool.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;

use cloudvote_common::lifecycle::{PoolBackend, PoolLifecycle};

/// Bind `addr` and serve `app` until `shutdown` resolves, then stop the pool.
///
/// The pool is stopped whether binding fails, serving fails or the server
/// shuts down gracefully.
pub async fn serve_until_shutdown<B, F>(
    lifecycle: &PoolLifecycle<B>,
    addr: SocketAddr,
    app: Router,
    shutdown: F,
) -> anyhow::Result<()>
where
    B: PoolBackend,
    F: Future<Output = ()> + Send + 'static,
{
    let served = bind_and_serve(addr, app, shutdown).await;

    lifecycle.on_stop().await;
    if let Err(e) = &served {
        tracing::error!(error = ?e, "API server exited with error");
    }
    served
}

async fn bind_and_serve<F>(addr: SocketAddr, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server error")
}
