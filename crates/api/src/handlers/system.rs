//! System health and database introspection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use intellifactory_core::types::Timestamp;
use intellifactory_db::models::anomaly::Anomaly;
use intellifactory_db::models::machine::Machine;
use intellifactory_db::models::reading::Reading;
use intellifactory_db::repositories::{AnomalyRepo, MachineRepo, ReadingRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// System health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct WebsocketStatus {
    pub connected_clients: usize,
    pub real_time_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SystemHealth {
    pub timestamp: Timestamp,
    pub status: &'static str,
    pub database: &'static str,
    pub websocket: WebsocketStatus,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SystemUnhealthy {
    pub timestamp: Timestamp,
    pub status: &'static str,
    pub error: String,
}

/// GET /api/system/health
///
/// 200 with database and push-channel status, or 500 when the database
/// does not answer.
pub async fn system_health(State(state): State<AppState>) -> Response {
    if let Err(e) = intellifactory_db::health_check(&state.pool).await {
        tracing::error!(error = %e, "System health check failed");
        let body = SystemUnhealthy {
            timestamp: Utc::now(),
            status: "unhealthy",
            error: e.to_string(),
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    Json(SystemHealth {
        timestamp: Utc::now(),
        status: "healthy",
        database: "connected",
        websocket: WebsocketStatus {
            connected_clients: state.ws_manager.connection_count().await,
            real_time_enabled: true,
        },
        version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}

// ---------------------------------------------------------------------------
// Debug
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReadingRange {
    pub earliest: Timestamp,
    pub latest: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct DebugInfo {
    pub anomalies_count: i64,
    pub readings_count: i64,
    pub machines_count: usize,
    pub reading_range: Option<ReadingRange>,
    pub sample_reading: Option<Reading>,
    pub sample_anomaly: Option<Anomaly>,
    pub machines_list: Vec<Machine>,
}

/// GET /api/debug
///
/// Table counts, the stored reading time range, the newest reading and
/// anomaly, and the machine list.
pub async fn debug_info(State(state): State<AppState>) -> AppResult<Json<DebugInfo>> {
    let pool = &state.pool;
    let (anomalies_count, readings_count, range, latest_readings, latest_anomalies, machines) =
        tokio::try_join!(
            AnomalyRepo::count(pool),
            ReadingRepo::count(pool),
            ReadingRepo::time_range(pool),
            ReadingRepo::list_latest(pool, 1),
            AnomalyRepo::list_recent(pool, 1),
            MachineRepo::list(pool),
        )?;

    tracing::debug!(anomalies_count, readings_count, "Debug snapshot");

    Ok(Json(DebugInfo {
        anomalies_count,
        readings_count,
        machines_count: machines.len(),
        reading_range: range.map(|(earliest, latest)| ReadingRange { earliest, latest }),
        sample_reading: latest_readings.into_iter().next(),
        sample_anomaly: latest_anomalies.into_iter().next(),
        machines_list: machines,
    }))
}
