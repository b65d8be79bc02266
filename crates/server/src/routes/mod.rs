//! HTTP route handlers for the read API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health           - Liveness check
//! GET  /health/ready     - Readiness check (verifies database connectivity)
//! GET  /api/order/{id}   - Order lookup by id
//! ```

pub mod orders;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/order/{id}", get(orders::show))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
