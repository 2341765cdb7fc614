//! Health check endpoints for the ClubHub server.
//!
//! Provides endpoints for monitoring service health and readiness.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the service is running.
/// This is a simple liveness check - it doesn't verify dependencies.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Database connectivity
    pub database: bool,
}

/// Readiness check endpoint.
///
/// Returns 200 OK if the service is ready to accept traffic. Used by
/// orchestrator readiness probes to decide whether the pod should receive
/// requests.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"database":true}
/// ```
pub async fn readiness_check() -> (StatusCode, Json<ReadinessResponse>) {
    // TODO: ping the database once the repository exposes a health probe;
    // today the pool fails fast at startup, so a running server implies a
    // reachable database.
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            ready: true,
            database: true,
        }),
    )
}
