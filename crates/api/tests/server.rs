//! Pool teardown around the HTTP server, without a database.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;

use cloudvote_api::server::serve_until_shutdown;
use cloudvote_common::config::AppConfig;
use cloudvote_common::error::AppError;
use cloudvote_common::lifecycle::{LifecycleState, PoolBackend, PoolLifecycle};
use cloudvote_common::pool::{IpType, PoolConfig};

// ============================================================
// Helpers
// ============================================================

/// Backend whose pool is a unit handle; counts how often it is closed.
#[derive(Default, Clone)]
struct CountingBackend {
    closed: Arc<AtomicUsize>,
}

impl PoolBackend for CountingBackend {
    type Pool = ();

    fn build(&self, _config: &PoolConfig) -> Result<(), AppError> {
        Ok(())
    }

    async fn ensure_schema(&self, _config: &PoolConfig, _pool: &()) -> Result<(), AppError> {
        Ok(())
    }

    async fn close(&self, _pool: ()) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

async fn started_lifecycle() -> (PoolLifecycle<CountingBackend>, Arc<AtomicUsize>) {
    let app = AppConfig {
        instance_connection_name: "proj:region:inst".to_string(),
        jdbc_url: "jdbc:mysql://127.0.0.1/votes_db".to_string(),
        db_user: "root".to_string(),
        db_pass: "secret".to_string(),
        db_name: "votes_db".to_string(),
        ip_type: IpType::Private,
        port: 8080,
    };
    let backend = CountingBackend::default();
    let closed = backend.closed.clone();
    let lifecycle =
        PoolLifecycle::with_backend(PoolConfig::from_app_config(&app).unwrap(), backend);

    lifecycle.on_start().await.unwrap();
    (lifecycle, closed)
}

// ============================================================
// Tests
// ============================================================

#[tokio::test]
async fn test_bind_failure_still_closes_pool() {
    let (lifecycle, closed) = started_lifecycle().await;

    // Hold the port so the server cannot bind it
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let err = serve_until_shutdown(&lifecycle, addr, Router::new(), std::future::pending())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to bind"));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert_eq!(lifecycle.state().await, LifecycleState::Stopped);
}

#[tokio::test]
async fn test_graceful_shutdown_closes_pool_once() {
    let (lifecycle, closed) = started_lifecycle().await;
    let addr = "127.0.0.1:0".parse().unwrap();

    serve_until_shutdown(&lifecycle, addr, Router::new(), async {})
        .await
        .unwrap();
    lifecycle.on_stop().await;

    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(lifecycle.pool().await.is_none());
}
