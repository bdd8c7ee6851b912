//! Health check endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use cloudvote_common::error::AppError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "cloudvote-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health/db — Check out a pooled connection and ping the database.
///
/// An exhausted pool surfaces as 503 once the acquire timeout elapses.
async fn db_health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut conn = state.pool.acquire().await?;
    sqlx::query("SELECT 1").execute(&mut *conn).await?;

    Ok(Json(json!({
        "status": "ok",
        "pool_size": state.pool.size(),
        "idle": state.pool.num_idle(),
    })))
}
