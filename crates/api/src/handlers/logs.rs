use axum::extract::State;
use axum::Json;
use intellifactory_core::reading::log_status;
use intellifactory_core::types::Timestamp;
use intellifactory_db::models::reading::Reading;
use intellifactory_db::repositories::ReadingRepo;
use serde::Serialize;

use crate::state::AppState;

/// One row of the readings log.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub machine_id: String,
    pub temperature: Option<f64>,
    pub units_produced: Option<i32>,
    pub error_flag: bool,
    /// `anomaly` when the error flag is set, otherwise `normal`.
    pub status: &'static str,
}

impl From<Reading> for LogEntry {
    fn from(r: Reading) -> Self {
        Self {
            timestamp: r.timestamp,
            machine_id: r.machine_id,
            temperature: r.temperature,
            units_produced: r.units_produced,
            error_flag: r.error_flag,
            status: log_status(r.error_flag),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub logs: Vec<LogEntry>,
}

/// GET /api/logs
///
/// Readings over the dashboard window, newest first. Database failures
/// answer 200 with an empty list and an `error` field.
pub async fn list_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    let window = &state.config.dashboard;
    match ReadingRepo::list_recent_or_latest(&state.pool, window.window_hours, window.fallback_limit)
        .await
    {
        Ok(readings) => Json(LogsResponse {
            error: None,
            logs: readings.into_iter().map(LogEntry::from).collect(),
        }),
        Err(e) => {
            tracing::error!(error = %e, "Logs query failed");
            Json(LogsResponse {
                error: Some(e.to_string()),
                logs: Vec::new(),
            })
        }
    }
}
