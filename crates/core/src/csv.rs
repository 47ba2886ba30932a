//! CSV codec for reading imports and anomaly exports.
//!
//! Rows that cannot be turned into a [`SensorRecord`] are reported back to
//! the caller instead of aborting the whole import.

use std::io;

use csv::{Position, ReaderBuilder, StringRecord, Trim, Writer};

use crate::reading::{parse_error_flag, parse_timestamp, parse_units, SensorRecord};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CsvError {
    #[error("CSV is empty")]
    Empty,

    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("CSV header is unreadable: {0}")]
    Header(String),
}

/// A data row that was not imported.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number where the row starts (the header is line 1).
    pub line: usize,
    pub reason: String,
}

/// Result of parsing a readings file.
#[derive(Debug, Default)]
pub struct ParsedReadings {
    pub records: Vec<SensorRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Column positions resolved from the header row. `machine_id` and
/// `timestamp` are required; the rest are optional.
struct Columns {
    machine_id: usize,
    timestamp: usize,
    temperature: Option<usize>,
    units_produced: Option<usize>,
    error_flag: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, CsvError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };
        Ok(Self {
            machine_id: find("machine_id").ok_or(CsvError::MissingColumn("machine_id"))?,
            timestamp: find("timestamp").ok_or(CsvError::MissingColumn("timestamp"))?,
            temperature: find("temperature"),
            units_produced: find("units_produced"),
            error_flag: find("error_flag"),
        })
    }
}

/// Parse a readings CSV (`machine_id, timestamp, temperature, units_produced,
/// error_flag` in any order).
///
/// Rows with a missing machine id or timestamp, an unparsable number or
/// broken quoting are skipped and listed in [`ParsedReadings::skipped`].
pub fn parse_readings(text: &str) -> Result<ParsedReadings, CsvError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CsvError::Header(e.to_string()))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(CsvError::Empty);
    }
    let columns = Columns::resolve(&headers)?;

    let mut parsed = ParsedReadings::default();
    for result in reader.records() {
        let (line, outcome) = match result {
            Ok(record) => (line_of(record.position()), parse_row(&record, &columns)),
            Err(e) => (line_of(e.position()), Err(e.to_string())),
        };
        match outcome {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                tracing::warn!(line, %reason, "Skipping malformed CSV row");
                parsed.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok(parsed)
}

fn line_of(position: Option<&Position>) -> usize {
    position.map_or(0, |p| p.line() as usize)
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<SensorRecord, String> {
    let cell = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");

    let machine_id = cell(Some(columns.machine_id));
    if machine_id.is_empty() {
        return Err("missing machine_id".into());
    }

    let raw_ts = cell(Some(columns.timestamp));
    if raw_ts.is_empty() {
        return Err("missing timestamp".into());
    }
    let timestamp =
        parse_timestamp(raw_ts).ok_or_else(|| format!("invalid timestamp '{raw_ts}'"))?;

    let temperature = match cell(columns.temperature) {
        "" => None,
        raw => Some(
            raw.parse::<f64>()
                .map_err(|_| format!("invalid temperature '{raw}'"))?,
        ),
    };

    let units_produced = match cell(columns.units_produced) {
        "" => None,
        raw => Some(parse_units(raw).ok_or_else(|| format!("invalid units_produced '{raw}'"))?),
    };

    let raw_flag = cell(columns.error_flag);
    let error_flag =
        parse_error_flag(raw_flag).ok_or_else(|| format!("invalid error_flag '{raw_flag}'"))?;

    Ok(SensorRecord {
        machine_id: machine_id.to_string(),
        timestamp: Some(timestamp),
        temperature,
        units_produced,
        error_flag,
    })
}

/// Write a header row followed by data rows. Returns the number of data rows.
pub fn write_rows<W, I>(out: W, headers: &[&str], rows: I) -> Result<usize, csv::Error>
where
    W: io::Write,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = Writer::from_writer(out);
    writer.write_record(headers)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
