//! Batch detection over a readings CSV.

use std::path::{Path, PathBuf};

use intellifactory_core::csv::{parse_readings, CsvError, ParsedReadings, SkippedRow};
use intellifactory_core::detector::{evaluate, DetectionThresholds};
use intellifactory_db::models::anomaly::{CreateAnomaly, InsertSummary};
use intellifactory_db::models::reading::CreateReading;
use intellifactory_db::repositories::{AnomalyRepo, ReadingRepo};
use intellifactory_db::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    #[error("failed to clear existing anomalies: {0}")]
    Clear(#[source] sqlx::Error),
}

/// Outcome of one detection run.
#[derive(Debug, Default)]
pub struct DetectionReport {
    /// Anomalies removed before the run (`None` with `--keep-existing`).
    pub cleared: Option<u64>,
    pub skipped: Vec<SkippedRow>,
    pub readings_stored: usize,
    pub readings_failed: usize,
    pub anomalies: InsertSummary,
}

/// Read and parse a readings CSV.
pub async fn load_readings(path: &Path) -> Result<ParsedReadings, DetectionError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DetectionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_readings(&text).map_err(|source| DetectionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Store every valid row as a reading, evaluate it, and insert each
/// resulting anomaly independently.
///
/// Unless `keep_existing` is set the anomalies table is cleared first, so
/// re-running on the same file does not duplicate rows. A failed insert is
/// counted and the run continues.
pub async fn run_detection(
    pool: &DbPool,
    path: &Path,
    thresholds: &DetectionThresholds,
    keep_existing: bool,
) -> Result<DetectionReport, DetectionError> {
    let parsed = load_readings(path).await?;
    tracing::info!(
        path = %path.display(),
        rows = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "Parsed readings"
    );

    let mut report = DetectionReport {
        skipped: parsed.skipped,
        ..Default::default()
    };

    if !keep_existing {
        let cleared = AnomalyRepo::delete_all(pool)
            .await
            .map_err(DetectionError::Clear)?;
        tracing::info!(cleared, "Cleared old anomalies");
        report.cleared = Some(cleared);
    }

    for record in &parsed.records {
        let Some(input) = CreateReading::from_record(record) else {
            continue;
        };
        if let Err(e) = ReadingRepo::insert(pool, &input).await {
            tracing::error!(error = %e, machine_id = %input.machine_id, "Failed to store reading");
            report.readings_failed += 1;
            continue;
        }
        report.readings_stored += 1;

        let anomalies: Vec<CreateAnomaly> = evaluate(record, thresholds)
            .into_iter()
            .map(CreateAnomaly::from)
            .collect();
        let summary = AnomalyRepo::insert_each(pool, &anomalies).await;
        report.anomalies.inserted += summary.inserted;
        report.anomalies.failed += summary.failed;
    }

    tracing::info!(
        readings = report.readings_stored,
        anomalies = report.anomalies.inserted,
        failed = report.anomalies.failed + report.readings_failed,
        "Detection run complete"
    );
    Ok(report)
}
