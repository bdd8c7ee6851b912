//! Integration tests for the pool lifecycle against a real MySQL server.
//!
//! The live tests need a reachable database described by the usual variables:
//!
//! ```bash
//! INSTANCE_CONNECTION_NAME="proj:region:inst" JDBC_URL="jdbc:mysql://127.0.0.1/votes_db" \
//!   DB_USER=root DB_PASS=secret DB_NAME=votes_db \
//!   cargo test -p cloudvote-common --test lifecycle -- --ignored --nocapture
//! ```

use std::time::{Duration, Instant};

use sqlx::MySqlPool;

use cloudvote_common::config::AppConfig;
use cloudvote_common::error::AppError;
use cloudvote_common::lifecycle::{LifecycleState, PoolLifecycle};
use cloudvote_common::pool::{IpType, PoolConfig};

// ============================================================
// Helpers
// ============================================================

fn unreachable_config() -> PoolConfig {
    let app = AppConfig {
        instance_connection_name: "proj:region:inst".to_string(),
        // Nothing listens on port 1
        jdbc_url: "jdbc:mysql://127.0.0.1:1/votes_db".to_string(),
        db_user: "root".to_string(),
        db_pass: "secret".to_string(),
        db_name: "votes_db".to_string(),
        ip_type: IpType::Private,
        port: 8080,
    };
    PoolConfig::from_app_config(&app).unwrap()
}

async fn votes_columns(pool: &MySqlPool) -> Vec<(String, String)> {
    sqlx::query_as(
        "SELECT CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR) FROM information_schema.columns \
         WHERE table_schema = DATABASE() AND table_name = 'votes' ORDER BY ORDINAL_POSITION",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

// ============================================================
// Failure paths (no database needed)
// ============================================================

#[tokio::test]
async fn test_unreachable_database_fails_fast() {
    let lifecycle = PoolLifecycle::new(unreachable_config());
    assert_eq!(lifecycle.config().connection_timeout, Duration::from_secs(60));

    let started = Instant::now();
    let err = lifecycle.on_start().await.unwrap_err();
    let elapsed = started.elapsed();

    // A refused connection is reported on the first attempt, well inside the
    // 60 s checkout timeout, with the I/O error as the cause.
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
    match &err {
        AppError::Schema(sqlx::Error::Io(io)) => {
            assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused)
        }
        other => panic!("expected schema error caused by I/O, got {other:?}"),
    }
    let source = std::error::Error::source(&err).unwrap();
    assert!(!source.to_string().contains("pool timed out"));

    assert!(lifecycle.pool().await.is_none());
    assert_eq!(lifecycle.state().await, LifecycleState::Uninitialized);

    // Nothing was stored, so stopping is a no-op
    lifecycle.on_stop().await;
    assert_eq!(lifecycle.state().await, LifecycleState::Uninitialized);
}

#[tokio::test]
async fn test_stop_before_start() {
    let lifecycle = PoolLifecycle::new(unreachable_config());
    lifecycle.on_stop().await;
    assert!(lifecycle.pool().await.is_none());
}

// ============================================================
// Live database
// ============================================================

#[tokio::test]
#[ignore]
async fn test_start_creates_votes_table() {
    let app = AppConfig::from_env().unwrap();
    let lifecycle = PoolLifecycle::new(PoolConfig::from_app_config(&app).unwrap());

    let pool = lifecycle.on_start().await.unwrap();
    assert_eq!(pool.options().get_max_connections(), 5);
    assert_eq!(pool.options().get_min_connections(), 5);

    let columns = votes_columns(&pool).await;
    let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["vote_id", "time_cast", "candidate"]);
    assert!(columns[0].1.starts_with("bigint"));
    assert_eq!(columns[1].1, "timestamp");
    assert_eq!(columns[2].1, "char(6)");

    // Second start reuses the pool and finds the table in place
    let again = lifecycle.on_start().await.unwrap();
    assert!(!again.is_closed());

    lifecycle.on_stop().await;
    assert!(pool.is_closed());
    assert!(again.is_closed());
    assert_eq!(lifecycle.state().await, LifecycleState::Stopped);

    lifecycle.on_stop().await;
}
