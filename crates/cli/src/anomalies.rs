//! Listing, searching, exporting and clearing stored anomalies.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use intellifactory_core::csv::write_rows;
use intellifactory_db::models::anomaly::Anomaly;
use intellifactory_db::repositories::AnomalyRepo;
use intellifactory_db::DbPool;

/// Column order of the export file.
pub const EXPORT_HEADERS: [&str; 5] = ["machine_id", "timestamp", "anomaly_type", "value", "message"];

/// One export row in [`EXPORT_HEADERS`] order. Missing values are empty cells.
pub fn export_row(anomaly: &Anomaly) -> Vec<String> {
    vec![
        anomaly.machine_id.clone(),
        anomaly.timestamp.to_rfc3339(),
        anomaly.anomaly_type.clone(),
        anomaly.value.map(|v| v.to_string()).unwrap_or_default(),
        anomaly.message.clone().unwrap_or_default(),
    ]
}

/// A single line for terminal output.
pub fn format_anomaly(anomaly: &Anomaly) -> String {
    let value = anomaly
        .value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<6} {}  {:<12} {:<18} {:>8}  {}",
        anomaly.id,
        anomaly.timestamp.format("%Y-%m-%d %H:%M:%S"),
        anomaly.machine_id,
        anomaly.anomaly_type,
        value,
        anomaly.message.as_deref().unwrap_or("")
    )
}

pub fn print_anomalies(anomalies: &[Anomaly]) {
    if anomalies.is_empty() {
        println!("No anomalies found.");
        return;
    }
    for anomaly in anomalies {
        println!("{}", format_anomaly(anomaly));
    }
}

pub async fn list(pool: &DbPool, limit: i64) -> anyhow::Result<()> {
    let anomalies = AnomalyRepo::list_recent(pool, limit)
        .await
        .context("failed to load anomalies")?;
    print_anomalies(&anomalies);
    Ok(())
}

pub async fn search(pool: &DbPool, machine_id: &str, limit: i64) -> anyhow::Result<()> {
    let anomalies = AnomalyRepo::list_for_machine(pool, machine_id, limit)
        .await
        .with_context(|| format!("failed to load anomalies for {machine_id}"))?;
    print_anomalies(&anomalies);
    Ok(())
}

/// Write the `limit` most recent anomalies to `output`. Returns the row count.
pub async fn export(pool: &DbPool, output: &Path, limit: i64) -> anyhow::Result<usize> {
    let anomalies = AnomalyRepo::list_recent(pool, limit)
        .await
        .context("failed to load anomalies")?;

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let count = write_rows(file, &EXPORT_HEADERS, anomalies.iter().map(export_row))
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(count, path = %output.display(), "Anomalies exported");
    println!("Exported {count} anomalies to {}", output.display());
    Ok(count)
}

pub async fn clear(pool: &DbPool) -> anyhow::Result<u64> {
    let deleted = AnomalyRepo::delete_all(pool)
        .await
        .context("failed to delete anomalies")?;
    println!("Cleared {deleted} anomalies.");
    Ok(deleted)
}
