//! Anomaly entity and DTOs.

use intellifactory_core::anomaly::{AnomalyType, DetectedAnomaly};
use intellifactory_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A stored anomaly event. Append-only; removed only by bulk delete.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Anomaly {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub machine_id: String,
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub value: Option<f64>,
    pub message: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting an anomaly produced by the evaluator.
#[derive(Debug, Clone)]
pub struct CreateAnomaly {
    pub timestamp: Timestamp,
    pub machine_id: String,
    pub anomaly_type: AnomalyType,
    pub value: Option<f64>,
    pub message: Option<String>,
}

impl From<DetectedAnomaly> for CreateAnomaly {
    fn from(detected: DetectedAnomaly) -> Self {
        Self {
            timestamp: detected.timestamp,
            machine_id: detected.machine_id,
            anomaly_type: detected.anomaly_type,
            value: Some(detected.value),
            message: Some(detected.message),
        }
    }
}

/// Outcome of inserting a batch of anomalies one row at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub inserted: usize,
    pub failed: usize,
}
