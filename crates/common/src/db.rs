use std::io;

use sqlx::{Connection, MySqlConnection, MySqlPool};

use crate::error::AppError;
use crate::lifecycle::PoolBackend;
use crate::pool::PoolConfig;
use crate::schema;

/// Create a MySQL connection pool without opening any connection yet.
///
/// sqlx starts warming `min_idle` connections in the background. Must be
/// called from within a tokio runtime.
pub fn create_pool(config: &PoolConfig) -> MySqlPool {
    let pool = config
        .pool_options()
        .connect_lazy_with(config.connect_options());

    tracing::info!(
        url = %config.jdbc_url(),
        instance = %config.instance_connection_name,
        socket_factory = %config.socket_factory,
        ip_type = %config.ip_type,
        max_connections = config.max_pool_size,
        min_idle = config.min_idle,
        "Created MySQL connection pool"
    );
    pool
}

/// Lifecycle backend for a real MySQL server.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlBackend;

impl PoolBackend for MySqlBackend {
    type Pool = MySqlPool;

    fn build(&self, config: &PoolConfig) -> Result<MySqlPool, AppError> {
        Ok(create_pool(config))
    }

    /// Runs the DDL on a dedicated connection rather than a pooled one: pool
    /// checkouts retry refused connections until the acquire timeout, which
    /// would hide the real cause of an unreachable server.
    async fn ensure_schema(&self, config: &PoolConfig, _pool: &MySqlPool) -> Result<(), AppError> {
        let options = config.connect_options();
        let connect = MySqlConnection::connect_with(&options);
        let mut conn = tokio::time::timeout(config.connection_timeout, connect)
            .await
            .map_err(|_| {
                AppError::Schema(sqlx::Error::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "timed out connecting to MySQL",
                )))
            })?
            .map_err(AppError::Schema)?;

        let result = schema::ensure_votes_table(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close schema connection");
        }
        result.map_err(AppError::Schema)
    }

    async fn close(&self, pool: MySqlPool) {
        pool.close().await;
        tracing::info!("MySQL connection pool closed");
    }
}
