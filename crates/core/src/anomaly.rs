//! Anomaly kinds and the events produced by the evaluator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// The threshold rule that flagged a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// `units_produced` fell below the production floor.
    LowProduction,
    /// `temperature` rose above the temperature ceiling.
    HighTemperature,
    /// The machine raised its error flag.
    ErrorFlagRaised,
}

impl AnomalyType {
    /// Canonical name stored in the `anomalies.anomaly_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyType::LowProduction => "low_production",
            AnomalyType::HighTemperature => "high_temperature",
            AnomalyType::ErrorFlagRaised => "error_flag_raised",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low_production" => Ok(AnomalyType::LowProduction),
            "high_temperature" => Ok(AnomalyType::HighTemperature),
            "error_flag_raised" => Ok(AnomalyType::ErrorFlagRaised),
            other => Err(CoreError::Validation(format!(
                "unknown anomaly type '{other}'"
            ))),
        }
    }
}

/// One threshold violation found in one reading. Not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedAnomaly {
    pub machine_id: String,
    pub timestamp: Timestamp,
    pub anomaly_type: AnomalyType,
    /// The observed value (units, degrees, or `1` for a raised error flag).
    pub value: f64,
    pub message: String,
}
