//! Sensor reading entity and DTOs.

use intellifactory_core::reading::SensorRecord;
use intellifactory_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A stored sensor reading. Immutable once recorded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reading {
    pub id: DbId,
    pub machine_id: String,
    pub timestamp: Timestamp,
    pub temperature: Option<f64>,
    pub units_produced: Option<i32>,
    pub error_flag: bool,
    pub created_at: Timestamp,
}

impl Reading {
    /// View this row as evaluator input.
    pub fn to_record(&self) -> SensorRecord {
        SensorRecord {
            machine_id: self.machine_id.clone(),
            timestamp: Some(self.timestamp),
            temperature: self.temperature,
            units_produced: self.units_produced,
            error_flag: self.error_flag,
        }
    }
}

/// DTO for inserting a new reading.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReading {
    #[validate(length(min = 1, max = 50))]
    pub machine_id: String,
    pub timestamp: Timestamp,
    pub temperature: Option<f64>,
    #[validate(range(min = 0))]
    pub units_produced: Option<i32>,
    #[serde(default)]
    pub error_flag: bool,
}

impl CreateReading {
    /// Build an insert DTO from evaluator input. Returns `None` when the
    /// record has no timestamp (such readings cannot be stored).
    pub fn from_record(record: &SensorRecord) -> Option<Self> {
        Some(Self {
            machine_id: record.machine_id.clone(),
            timestamp: record.timestamp?,
            temperature: record.temperature,
            units_produced: record.units_produced,
            error_flag: record.error_flag,
        })
    }

    pub fn to_record(&self) -> SensorRecord {
        SensorRecord {
            machine_id: self.machine_id.clone(),
            timestamp: Some(self.timestamp),
            temperature: self.temperature,
            units_produced: self.units_produced,
            error_flag: self.error_flag,
        }
    }
}
