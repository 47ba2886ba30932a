//! Repository for the `readings` table (append-only time-series).

use chrono::Utc;
use intellifactory_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::reading::{CreateReading, Reading};

/// Column list for `readings` SELECT queries.
const COLUMNS: &str = "\
    id, machine_id, timestamp, temperature, units_produced, error_flag, created_at";

/// Provides query operations for sensor readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Insert a single reading.
    pub async fn insert(pool: &PgPool, input: &CreateReading) -> Result<Reading, sqlx::Error> {
        let query = format!(
            "INSERT INTO readings (machine_id, timestamp, temperature, units_produced, error_flag) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(&input.machine_id)
            .bind(input.timestamp)
            .bind(input.temperature)
            .bind(input.units_produced)
            .bind(input.error_flag)
            .fetch_one(pool)
            .await
    }

    /// Readings recorded at or after `since`, newest first.
    pub async fn list_since(pool: &PgPool, since: Timestamp) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM readings \
             WHERE timestamp >= $1 \
             ORDER BY timestamp DESC, id DESC"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent readings, newest first.
    pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM readings \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Readings from the last `hours` hours, or the `fallback_limit` most
    /// recent readings if that window is empty (e.g. replayed historical data).
    pub async fn list_recent_or_latest(
        pool: &PgPool,
        hours: i64,
        fallback_limit: i64,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let since = Utc::now() - chrono::Duration::hours(hours);
        let recent = Self::list_since(pool, since).await?;
        if !recent.is_empty() {
            return Ok(recent);
        }
        tracing::debug!(hours, fallback_limit, "No readings in window, using most recent");
        Self::list_latest(pool, fallback_limit).await
    }

    /// Total number of stored readings.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readings")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Earliest and latest reading timestamps, if any readings exist.
    pub async fn time_range(pool: &PgPool) -> Result<Option<(Timestamp, Timestamp)>, sqlx::Error> {
        let (earliest, latest): (Option<Timestamp>, Option<Timestamp>) =
            sqlx::query_as("SELECT MIN(timestamp), MAX(timestamp) FROM readings")
                .fetch_one(pool)
                .await?;
        Ok(earliest.zip(latest))
    }
}
