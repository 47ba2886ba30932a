use std::path::Path;

use intellifactory_core::detector::DetectionThresholds;
use intellifactory_db::DbPool;

use crate::anomalies;
use crate::cli::DEFAULT_LIST_LIMIT;
use crate::detect::{run_detection, DetectionReport};

/// Run detection on `path` and print a summary followed by the most recent
/// anomalies.
pub async fn detect(
    pool: &DbPool,
    path: &Path,
    thresholds: &DetectionThresholds,
    keep_existing: bool,
) -> anyhow::Result<()> {
    let report = run_detection(pool, path, thresholds, keep_existing).await?;
    print_report(&report);

    println!("\nMost recent anomalies:");
    anomalies::list(pool, DEFAULT_LIST_LIMIT).await
}

fn print_report(report: &DetectionReport) {
    if let Some(cleared) = report.cleared {
        println!("Cleared {cleared} old anomalies.");
    }
    for skipped in &report.skipped {
        println!("Skipped line {}: {}", skipped.line, skipped.reason);
    }
    println!(
        "Stored {} readings ({} failed), recorded {} anomalies ({} failed).",
        report.readings_stored,
        report.readings_failed,
        report.anomalies.inserted,
        report.anomalies.failed
    );
}
