use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use intellifactory_core::detector::evaluate;
use intellifactory_core::types::Timestamp;
use intellifactory_db::models::anomaly::{Anomaly, CreateAnomaly};
use intellifactory_db::models::reading::{CreateReading, Reading};
use intellifactory_db::repositories::{AnomalyRepo, ReadingRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::snapshot::SnapshotWindow;
use crate::state::AppState;

/// Request body for `POST /api/readings`.
#[derive(Debug, Deserialize)]
pub struct IngestReading {
    pub machine_id: String,
    /// Defaults to the time of ingestion.
    pub timestamp: Option<Timestamp>,
    pub temperature: Option<f64>,
    pub units_produced: Option<i32>,
    #[serde(default)]
    pub error_flag: bool,
}

impl IngestReading {
    fn into_create(self, received_at: Timestamp) -> CreateReading {
        CreateReading {
            machine_id: self.machine_id.trim().to_string(),
            timestamp: self.timestamp.unwrap_or(received_at),
            temperature: self.temperature,
            units_produced: self.units_produced,
            error_flag: self.error_flag,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub reading: Reading,
    pub anomalies: Vec<Anomaly>,
}

/// Query params for `GET /api/readings`.
#[derive(Debug, Deserialize)]
pub struct ReadingListQuery {
    /// Window in hours; defaults to the dashboard window.
    /// Must be within `1..=SnapshotWindow::MAX_WINDOW_HOURS`.
    pub hours: Option<i64>,
}

/// POST /api/readings
///
/// Store the reading, evaluate it and store each anomaly it produced.
/// Every insert commits on its own.
pub async fn create_reading(
    State(state): State<AppState>,
    Json(body): Json<IngestReading>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    let input = body.into_create(Utc::now());
    input.validate()?;

    let reading = ReadingRepo::insert(&state.pool, &input).await?;

    let detected = evaluate(&reading.to_record(), &state.config.thresholds);
    let mut anomalies = Vec::with_capacity(detected.len());
    for anomaly in detected {
        let stored = AnomalyRepo::insert(&state.pool, &CreateAnomaly::from(anomaly)).await?;
        anomalies.push(stored);
    }

    tracing::info!(
        reading_id = reading.id,
        machine_id = %reading.machine_id,
        anomalies = anomalies.len(),
        "Reading ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse { reading, anomalies }),
    ))
}

/// GET /api/readings
pub async fn list_readings(
    State(state): State<AppState>,
    Query(params): Query<ReadingListQuery>,
) -> AppResult<Json<DataResponse<Vec<Reading>>>> {
    let window = &state.config.dashboard;
    let hours = params.hours.unwrap_or(window.window_hours);
    if !(1..=SnapshotWindow::MAX_WINDOW_HOURS).contains(&hours) {
        return Err(AppError::BadRequest(format!(
            "hours must be between 1 and {}",
            SnapshotWindow::MAX_WINDOW_HOURS
        )));
    }

    let readings =
        ReadingRepo::list_recent_or_latest(&state.pool, hours, window.fallback_limit).await?;
    Ok(Json(DataResponse { data: readings }))
}
