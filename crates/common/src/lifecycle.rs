//! Connection pool lifecycle: one shared pool per process, bound to service start/stop.
//!
//! `on_start` creates the pool once and verifies the `votes` table; `on_stop`
//! closes it. Both hooks are serialized through an async mutex so a pool is
//! only ever created or torn down by a single writer.

use std::future::Future;

use tokio::sync::Mutex;

use crate::db::MySqlBackend;
use crate::error::AppError;
use crate::pool::PoolConfig;

/// Operations the lifecycle needs from a concrete pool implementation.
pub trait PoolBackend: Send + Sync {
    /// Cheaply cloneable handle to the pool.
    type Pool: Clone + Send + Sync + 'static;

    /// Construct a pool from configuration. Must not block on the network.
    fn build(&self, config: &PoolConfig) -> Result<Self::Pool, AppError>;

    /// Make sure the required tables exist. Runs once per start, without retries.
    fn ensure_schema(
        &self,
        config: &PoolConfig,
        pool: &Self::Pool,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Release every held and idle connection.
    fn close(&self, pool: Self::Pool) -> impl Future<Output = ()> + Send;
}

/// Where the managed pool is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Stopped,
}

struct Slot<P> {
    pool: Option<P>,
    state: LifecycleState,
}

/// Owner of the process-wide connection pool.
pub struct PoolLifecycle<B: PoolBackend = MySqlBackend> {
    config: PoolConfig,
    backend: B,
    slot: Mutex<Slot<B::Pool>>,
}

impl PoolLifecycle<MySqlBackend> {
    pub fn new(config: PoolConfig) -> Self {
        Self::with_backend(config, MySqlBackend)
    }
}

impl<B: PoolBackend> PoolLifecycle<B> {
    pub fn with_backend(config: PoolConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            slot: Mutex::new(Slot {
                pool: None,
                state: LifecycleState::Uninitialized,
            }),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Create the pool if absent, then verify the schema.
    ///
    /// Returns a handle to the stored pool. On schema failure no retry is
    /// attempted: a pool created by this call is closed and not stored, while
    /// a pool from an earlier successful start is left in place.
    pub async fn on_start(&self) -> Result<B::Pool, AppError> {
        let mut slot = self.slot.lock().await;

        tracing::info!("Creating connection pool");

        let (pool, created) = match &slot.pool {
            Some(existing) => {
                tracing::debug!("Connection pool already initialized, reusing it");
                (existing.clone(), false)
            }
            None => (self.backend.build(&self.config)?, true),
        };

        if let Err(e) = self.backend.ensure_schema(&self.config, &pool).await {
            tracing::error!(error = ?e, "Schema verification failed");
            if created {
                self.backend.close(pool).await;
            }
            return Err(e);
        }

        if created {
            slot.pool = Some(pool.clone());
        }
        slot.state = LifecycleState::Initialized;
        Ok(pool)
    }

    /// Close the pool if one is present. Calling this with no pool is a no-op.
    pub async fn on_stop(&self) {
        let mut slot = self.slot.lock().await;

        match slot.pool.take() {
            Some(pool) => {
                tracing::info!("Closing connection pool");
                self.backend.close(pool).await;
                slot.state = LifecycleState::Stopped;
            }
            None => tracing::debug!("No connection pool to close"),
        }
    }

    /// Handle to the current pool, if started.
    pub async fn pool(&self) -> Option<B::Pool> {
        self.slot.lock().await.pool.clone()
    }

    pub async fn state(&self) -> LifecycleState {
        self.slot.lock().await.state
    }
}
