//! Repository for the `machines` registry.

use intellifactory_core::machine::{MachineStatus, DEFAULT_LOCATION};
use sqlx::PgPool;

use crate::models::machine::{Machine, UpsertMachine};

/// Column list for `machines` SELECT queries.
const COLUMNS: &str = "machine_id, name, location, status";

/// Provides query operations for machines.
pub struct MachineRepo;

impl MachineRepo {
    /// Machines in the registry, ordered by id.
    pub async fn list_registered(pool: &PgPool) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines ORDER BY machine_id");
        sqlx::query_as::<_, Machine>(&query).fetch_all(pool).await
    }

    /// Distinct machines seen in readings, presented as online machines on
    /// the factory floor.
    pub async fn list_from_readings(pool: &PgPool) -> Result<Vec<Machine>, sqlx::Error> {
        sqlx::query_as::<_, Machine>(
            "SELECT DISTINCT machine_id, machine_id AS name, $1::TEXT AS location, $2::TEXT AS status \
             FROM readings \
             ORDER BY machine_id",
        )
        .bind(DEFAULT_LOCATION)
        .bind(MachineStatus::Online.as_str())
        .fetch_all(pool)
        .await
    }

    /// The registry if it has entries, otherwise machines derived from readings.
    pub async fn list(pool: &PgPool) -> Result<Vec<Machine>, sqlx::Error> {
        let registered = Self::list_registered(pool).await?;
        if !registered.is_empty() {
            return Ok(registered);
        }
        tracing::debug!("Machine registry empty, deriving machines from readings");
        Self::list_from_readings(pool).await
    }

    /// Register a machine, or update name/location/status if it exists.
    pub async fn upsert(pool: &PgPool, input: &UpsertMachine) -> Result<Machine, sqlx::Error> {
        let query = format!(
            "INSERT INTO machines (machine_id, name, location, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (machine_id) DO UPDATE SET \
                name = EXCLUDED.name, \
                location = EXCLUDED.location, \
                status = EXCLUDED.status, \
                last_seen = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(&input.machine_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }
}
