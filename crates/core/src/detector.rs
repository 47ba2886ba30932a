//! Threshold evaluation for manufacturing sensor readings.
//!
//! Pure logic with no database access. Each reading is checked independently
//! against fixed limits; there is no cooldown, windowing or baseline, so
//! evaluating the same reading twice yields the same anomalies twice.

use std::fmt;
use std::str::FromStr;

use crate::anomaly::{AnomalyType, DetectedAnomaly};
use crate::error::CoreError;
use crate::reading::SensorRecord;

/// Default production floor: fewer units than this is anomalous.
pub const DEFAULT_MIN_UNITS_PRODUCED: i32 = 50;

/// Default temperature ceiling: anything hotter is anomalous.
pub const DEFAULT_MAX_TEMPERATURE: f64 = 75.0;

/// The limits used by the evaluator. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionThresholds {
    pub min_units_produced: i32,
    pub max_temperature: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_units_produced: DEFAULT_MIN_UNITS_PRODUCED,
            max_temperature: DEFAULT_MAX_TEMPERATURE,
        }
    }
}

impl DetectionThresholds {
    /// Load thresholds from `DETECT_MIN_UNITS` / `DETECT_MAX_TEMPERATURE`.
    ///
    /// Unset variables keep the defaults; a set but unparsable value is an
    /// error.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            min_units_produced: parse_override(&lookup, "DETECT_MIN_UNITS")?
                .unwrap_or(defaults.min_units_produced),
            max_temperature: parse_override(&lookup, "DETECT_MAX_TEMPERATURE")?
                .unwrap_or(defaults.max_temperature),
        })
    }
}

fn parse_override<T, F>(lookup: &F, name: &str) -> Result<Option<T>, CoreError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| CoreError::Validation(format!("{name} must be a valid number: {e}")))
        })
        .transpose()
}

/// Evaluate one reading and return its anomalies in rule order:
/// low production, high temperature, error flag.
///
/// A record without a timestamp cannot be placed on the timeline; it is
/// logged and yields nothing.
pub fn evaluate(record: &SensorRecord, thresholds: &DetectionThresholds) -> Vec<DetectedAnomaly> {
    let Some(timestamp) = record.timestamp else {
        tracing::warn!(
            machine_id = %record.machine_id,
            "Skipping reading without timestamp"
        );
        return Vec::new();
    };

    let mut anomalies = Vec::new();
    let mut push = |anomaly_type: AnomalyType, value: f64, message: String| {
        anomalies.push(DetectedAnomaly {
            machine_id: record.machine_id.clone(),
            timestamp,
            anomaly_type,
            value,
            message,
        });
    };

    if let Some(units) = record.units_produced {
        if units < thresholds.min_units_produced {
            push(
                AnomalyType::LowProduction,
                f64::from(units),
                format!(
                    "Units produced ({units}) below threshold ({}).",
                    thresholds.min_units_produced
                ),
            );
        }
    }

    if let Some(temperature) = record.temperature {
        if temperature > thresholds.max_temperature {
            push(
                AnomalyType::HighTemperature,
                temperature,
                format!(
                    "Temperature ({temperature}) above {} degrees.",
                    thresholds.max_temperature
                ),
            );
        }
    }

    if record.error_flag {
        push(
            AnomalyType::ErrorFlagRaised,
            1.0,
            "Error flag raised.".to_string(),
        );
    }

    anomalies
}

/// Evaluate a batch of readings, concatenating the anomalies in input order.
pub fn evaluate_all<'a, I>(records: I, thresholds: &DetectionThresholds) -> Vec<DetectedAnomaly>
where
    I: IntoIterator<Item = &'a SensorRecord>,
{
    records
        .into_iter()
        .flat_map(|record| evaluate(record, thresholds))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
