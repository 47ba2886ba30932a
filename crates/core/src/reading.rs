//! Sensor reading input types and parsing helpers.

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length of a machine identifier (matches the `VARCHAR(50)` column).
pub const MAX_MACHINE_ID_LEN: usize = 50;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Naive timestamp layouts accepted alongside RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One sensor sample as seen by the evaluator.
///
/// `timestamp` is optional because upstream sources (CSV files, ad-hoc
/// ingest) may omit it; the evaluator refuses to flag such records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub machine_id: String,
    pub timestamp: Option<Timestamp>,
    pub temperature: Option<f64>,
    pub units_produced: Option<i32>,
    #[serde(default)]
    pub error_flag: bool,
}

/// Status label shown next to a reading in the logs view.
pub fn log_status(error_flag: bool) -> &'static str {
    if error_flag {
        "anomaly"
    } else {
        "normal"
    }
}

/// Parse a timestamp from RFC 3339 or one of the naive `YYYY-MM-DD HH:MM[:SS]`
/// layouts (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse an error flag cell: `1`/`0`, `true`/`false`, `yes`/`no`, or an
/// integral float such as `1.0` (spreadsheet exports write flags that way).
///
/// An empty cell counts as `false`; anything else is rejected.
pub fn parse_error_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" => Some(false),
        "true" | "yes" => Some(true),
        other => match parse_integral(other)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
    }
}

/// Parse a unit count written either as `42` or `42.0`.
pub fn parse_units(raw: &str) -> Option<i32> {
    i32::try_from(parse_integral(raw)?).ok()
}

fn parse_integral(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT).then_some(f as i64)
}

/// Validate a machine identifier: non-blank and at most 50 characters.
pub fn validate_machine_id(machine_id: &str) -> Result<(), CoreError> {
    let trimmed = machine_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("machine_id must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_MACHINE_ID_LEN {
        return Err(CoreError::Validation(format!(
            "machine_id must be at most {MAX_MACHINE_ID_LEN} characters"
        )));
    }
    Ok(())
}
