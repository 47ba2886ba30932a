//! Chart-ready time series built from sensor readings.
//!
//! The dashboard renders two line charts (temperature and production per
//! machine) directly from these structs, so field names follow the
//! front-end charting library (`borderColor`, `backgroundColor`, ...).

use std::collections::{BTreeMap, BTreeSet};

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::reading::SensorRecord;
use crate::types::Timestamp;

/// Line/fill colour pairs cycled across temperature datasets.
const TEMPERATURE_COLORS: &[(&str, &str)] = &[
    ("rgba(255, 99, 132, 1)", "rgba(255, 99, 132, 0.2)"),
    ("rgba(54, 162, 235, 1)", "rgba(54, 162, 235, 0.2)"),
];

const PRODUCTION_COLOR: (&str, &str) = ("rgba(75, 192, 192, 1)", "rgba(75, 192, 192, 0.2)");

const EMPTY_COLOR: (&str, &str) = ("rgba(200, 200, 200, 1)", "rgba(200, 200, 200, 0.1)");

const LINE_TENSION: f64 = 0.1;

pub const TEMPERATURE_TITLE: &str = "Temperature";
pub const PRODUCTION_TITLE: &str = "Production";

/// One line on a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// One entry per label; `None` where the machine has no reading.
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// A labelled set of datasets sharing one x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// `HH:MM` labels, one per minute bucket, oldest first.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// The placeholder chart shown when there are no readings.
    pub fn empty(title: &str) -> Self {
        Self {
            labels: Vec::new(),
            datasets: vec![Dataset {
                label: title.to_string(),
                data: Vec::new(),
                border_color: EMPTY_COLOR.0.to_string(),
                background_color: EMPTY_COLOR.1.to_string(),
                tension: None,
            }],
        }
    }
}

/// Truncate a timestamp to the start of its minute.
pub fn minute_bucket(ts: Timestamp) -> Timestamp {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Temperature per machine over minute buckets.
pub fn temperature_series(readings: &[SensorRecord]) -> ChartData {
    build_series(readings, TEMPERATURE_TITLE, |r| r.temperature, |index| {
        TEMPERATURE_COLORS[index % TEMPERATURE_COLORS.len()]
    })
}

/// Units produced per machine over minute buckets.
pub fn production_series(readings: &[SensorRecord]) -> ChartData {
    build_series(
        readings,
        PRODUCTION_TITLE,
        |r| r.units_produced.map(f64::from),
        |_| PRODUCTION_COLOR,
    )
}

/// Group readings by machine and minute bucket.
///
/// When a machine has several readings in one bucket, the first one in
/// input order wins (callers pass readings newest first).
fn build_series<V, C>(readings: &[SensorRecord], title: &str, value: V, color: C) -> ChartData
where
    V: Fn(&SensorRecord) -> Option<f64>,
    C: Fn(usize) -> (&'static str, &'static str),
{
    let timed: Vec<(Timestamp, &SensorRecord)> = readings
        .iter()
        .filter_map(|r| r.timestamp.map(|ts| (minute_bucket(ts), r)))
        .collect();

    if timed.is_empty() {
        return ChartData::empty(title);
    }

    let buckets: BTreeSet<Timestamp> = timed.iter().map(|(bucket, _)| *bucket).collect();

    let mut by_machine: BTreeMap<&str, BTreeMap<Timestamp, Option<f64>>> = BTreeMap::new();
    for &(bucket, reading) in &timed {
        by_machine
            .entry(reading.machine_id.as_str())
            .or_default()
            .entry(bucket)
            .or_insert_with(|| value(reading));
    }

    let datasets = by_machine
        .iter()
        .enumerate()
        .map(|(index, (machine_id, points))| {
            let (border, background) = color(index);
            Dataset {
                label: format!("{machine_id} {title}"),
                data: buckets
                    .iter()
                    .map(|bucket| points.get(bucket).copied().flatten())
                    .collect(),
                border_color: border.to_string(),
                background_color: background.to_string(),
                tension: Some(LINE_TENSION),
            }
        })
        .collect();

    ChartData {
        labels: buckets
            .iter()
            .map(|bucket| bucket.format("%H:%M").to_string())
            .collect(),
        datasets,
    }
}
