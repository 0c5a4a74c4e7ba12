// src/routes/health.rs
//! Liveness endpoint for the analytics service.
//!
//! Serves `/health` for container orchestrators and `/health-check` for
//! older sensor gateways that still poll that path. Neither route sits
//! behind the bearer-token gate, and neither touches the reading store.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the health endpoints.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health` and `GET /health-check`.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the health routes.
///
/// Generic over the application state so it merges cleanly with the
/// gateway router whatever reading store backs it.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/health-check", get(health))
}
