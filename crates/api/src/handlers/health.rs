use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Service banner payload.
#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "IntelliFactory API is running!",
        status: "success",
    })
}

/// GET /health -- liveness plus database reachability. Always 200.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = intellifactory_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
