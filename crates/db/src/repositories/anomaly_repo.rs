//! Repository for the `anomalies` table.
//!
//! Rows are never updated. There is no deduplication: inserting the same
//! detected anomaly twice stores two rows.

use sqlx::PgPool;

use crate::models::anomaly::{Anomaly, CreateAnomaly, InsertSummary};

/// Column list for `anomalies` SELECT queries.
const COLUMNS: &str = "\
    id, timestamp, machine_id, anomaly_type, value, message, created_at";

/// Provides query operations for anomalies.
pub struct AnomalyRepo;

impl AnomalyRepo {
    /// Insert a single anomaly.
    pub async fn insert(pool: &PgPool, input: &CreateAnomaly) -> Result<Anomaly, sqlx::Error> {
        let query = format!(
            "INSERT INTO anomalies (timestamp, machine_id, anomaly_type, value, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let anomaly = sqlx::query_as::<_, Anomaly>(&query)
            .bind(input.timestamp)
            .bind(&input.machine_id)
            .bind(input.anomaly_type.as_str())
            .bind(input.value)
            .bind(&input.message)
            .fetch_one(pool)
            .await?;
        tracing::debug!(
            id = anomaly.id,
            machine_id = %anomaly.machine_id,
            anomaly_type = %anomaly.anomaly_type,
            "Anomaly inserted"
        );
        Ok(anomaly)
    }

    /// Insert anomalies one at a time, each in its own statement.
    ///
    /// A failed row is logged and counted; rows inserted before it stay
    /// committed and later rows are still attempted.
    pub async fn insert_each(pool: &PgPool, inputs: &[CreateAnomaly]) -> InsertSummary {
        let mut summary = InsertSummary::default();
        for input in inputs {
            match Self::insert(pool, input).await {
                Ok(_) => summary.inserted += 1,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        machine_id = %input.machine_id,
                        anomaly_type = %input.anomaly_type,
                        "Failed to insert anomaly"
                    );
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// The `limit` most recent anomalies by event timestamp.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Anomaly>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM anomalies \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Anomaly>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Anomalies for one machine, newest first.
    pub async fn list_for_machine(
        pool: &PgPool,
        machine_id: &str,
        limit: i64,
    ) -> Result<Vec<Anomaly>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM anomalies \
             WHERE machine_id = $1 \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Anomaly>(&query)
            .bind(machine_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total number of stored anomalies.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM anomalies")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Delete every anomaly. Returns the number of rows removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM anomalies").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
