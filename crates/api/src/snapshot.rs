//! Dashboard snapshot assembly.
//!
//! The same payload is served pull-based by `GET /api/dashboard` and pushed
//! to observers as the `liveupdate` event; only the query bounds differ.

use std::fmt::Display;

use chrono::Utc;
use intellifactory_core::chart::{
    production_series, temperature_series, ChartData, PRODUCTION_TITLE, TEMPERATURE_TITLE,
};
use intellifactory_core::reading::SensorRecord;
use intellifactory_core::types::Timestamp;
use intellifactory_db::models::anomaly::Anomaly;
use intellifactory_db::models::reading::Reading;
use intellifactory_db::repositories::{AnomalyRepo, MachineRepo, ReadingRepo};
use intellifactory_db::DbPool;
use serde::Serialize;

/// `status` value of a snapshot built from live data.
pub const STATUS_OK: &str = "ok";

/// `status` value of a degraded snapshot.
pub const STATUS_ERROR: &str = "error";

/// Query bounds for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotWindow {
    /// How many of the most recent anomalies to include.
    pub anomaly_limit: i64,
    /// Reading window in hours.
    pub window_hours: i64,
    /// How many readings to use when the window is empty.
    pub fallback_limit: i64,
    /// How many of the windowed readings to list individually.
    pub recent_readings_limit: usize,
}

impl SnapshotWindow {
    /// Largest accepted reading window.
    pub const MAX_WINDOW_HOURS: i64 = 24 * 366;
}

/// Counts, recent rows and chart series for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Number of anomalies in `recent_anomalies`.
    pub anomaly_count: usize,
    pub machine_count: usize,
    pub recent_anomalies: Vec<Anomaly>,
    /// Newest readings first.
    pub recent_readings: Vec<Reading>,
    pub temperature_data: ChartData,
    pub production_data: ChartData,
    pub status: &'static str,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DashboardSnapshot {
    /// Query anomalies, machines and readings concurrently and assemble
    /// a snapshot.
    pub async fn load(pool: &DbPool, window: &SnapshotWindow) -> Result<Self, sqlx::Error> {
        let (anomalies, machines, readings) = tokio::try_join!(
            AnomalyRepo::list_recent(pool, window.anomaly_limit),
            MachineRepo::list(pool),
            ReadingRepo::list_recent_or_latest(pool, window.window_hours, window.fallback_limit),
        )?;

        Ok(Self::from_parts(
            anomalies,
            machines.len(),
            readings,
            window.recent_readings_limit,
        ))
    }

    /// Assemble a snapshot from already-fetched rows.
    ///
    /// `readings` must be newest first; chart buckets keep the first reading
    /// per machine and minute.
    pub fn from_parts(
        anomalies: Vec<Anomaly>,
        machine_count: usize,
        readings: Vec<Reading>,
        recent_readings_limit: usize,
    ) -> Self {
        let records: Vec<SensorRecord> = readings.iter().map(Reading::to_record).collect();
        let temperature_data = temperature_series(&records);
        let production_data = production_series(&records);

        let mut recent_readings = readings;
        recent_readings.truncate(recent_readings_limit);

        Self {
            anomaly_count: anomalies.len(),
            machine_count,
            recent_anomalies: anomalies,
            recent_readings,
            temperature_data,
            production_data,
            status: STATUS_OK,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// The body served when the database cannot be queried: zero counts,
    /// empty lists and placeholder charts.
    pub fn degraded(error: impl Display) -> Self {
        Self {
            anomaly_count: 0,
            machine_count: 0,
            recent_anomalies: Vec::new(),
            recent_readings: Vec::new(),
            temperature_data: ChartData::empty(TEMPERATURE_TITLE),
            production_data: ChartData::empty(PRODUCTION_TITLE),
            status: STATUS_ERROR,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
        }
    }
}
