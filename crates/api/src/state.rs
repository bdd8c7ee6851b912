//! Shared application state for the Axum API server.

use sqlx::MySqlPool;

/// Application state shared across all route handlers via Axum `State`.
///
/// Holds a handle to the pool owned by `PoolLifecycle`; cloning it is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
}

impl AppState {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}
