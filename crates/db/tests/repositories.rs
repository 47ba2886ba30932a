//! Integration tests for the reading, anomaly and machine repositories.
//!
//! Exercises the repository layer against a real database:
//! - Bounded-recency queries and the empty-window fallback
//! - Append-only anomaly storage (no deduplication) and bulk delete
//! - Machine registry with derivation from readings

use chrono::{Duration, TimeZone, Utc};
use intellifactory_core::anomaly::AnomalyType;
use intellifactory_core::detector::{evaluate, DetectionThresholds};
use intellifactory_core::machine::MachineStatus;
use intellifactory_db::models::anomaly::CreateAnomaly;
use intellifactory_db::models::machine::UpsertMachine;
use intellifactory_db::models::reading::CreateReading;
use intellifactory_db::repositories::{AnomalyRepo, MachineRepo, ReadingRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_reading(machine_id: &str, minutes_ago: i64, temp: f64, units: i32) -> CreateReading {
    CreateReading {
        machine_id: machine_id.to_string(),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        temperature: Some(temp),
        units_produced: Some(units),
        error_flag: false,
    }
}

fn historical_reading(machine_id: &str, day: u32) -> CreateReading {
    CreateReading {
        machine_id: machine_id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
        temperature: Some(70.0),
        units_produced: Some(100),
        error_flag: false,
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_reading_round_trips_fields(pool: PgPool) {
    let input = CreateReading {
        machine_id: "M1".to_string(),
        timestamp: Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap(),
        temperature: None,
        units_produced: Some(42),
        error_flag: true,
    };
    let stored = ReadingRepo::insert(&pool, &input).await.unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.machine_id, "M1");
    assert_eq!(stored.timestamp, input.timestamp);
    assert_eq!(stored.temperature, None);
    assert_eq!(stored.units_produced, Some(42));
    assert!(stored.error_flag);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recent_window_returns_newest_first(pool: PgPool) {
    ReadingRepo::insert(&pool, &new_reading("M1", 30, 70.0, 100)).await.unwrap();
    ReadingRepo::insert(&pool, &new_reading("M2", 5, 71.0, 90)).await.unwrap();
    ReadingRepo::insert(&pool, &new_reading("M3", 180, 72.0, 80)).await.unwrap();

    let readings = ReadingRepo::list_recent_or_latest(&pool, 1, 50).await.unwrap();

    let machines: Vec<&str> = readings.iter().map(|r| r.machine_id.as_str()).collect();
    assert_eq!(machines, vec!["M2", "M1"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_window_falls_back_to_latest(pool: PgPool) {
    for day in 1..=5 {
        ReadingRepo::insert(&pool, &historical_reading("M1", day)).await.unwrap();
    }

    let readings = ReadingRepo::list_recent_or_latest(&pool, 1, 3).await.unwrap();

    assert_eq!(readings.len(), 3);
    assert_eq!(
        readings[0].timestamp,
        Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn count_and_time_range(pool: PgPool) {
    assert_eq!(ReadingRepo::time_range(&pool).await.unwrap(), None);

    ReadingRepo::insert(&pool, &historical_reading("M1", 2)).await.unwrap();
    ReadingRepo::insert(&pool, &historical_reading("M1", 6)).await.unwrap();

    assert_eq!(ReadingRepo::count(&pool).await.unwrap(), 2);
    let (earliest, latest) = ReadingRepo::time_range(&pool).await.unwrap().unwrap();
    assert_eq!(earliest.format("%d").to_string(), "02");
    assert_eq!(latest.format("%d").to_string(), "06");
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detected_anomalies_are_stored_in_order(pool: PgPool) {
    let reading = CreateReading {
        machine_id: "M5".to_string(),
        timestamp: Utc.with_ymd_and_hms(2025, 3, 7, 9, 20, 0).unwrap(),
        temperature: Some(90.0),
        units_produced: Some(30),
        error_flag: true,
    };
    let detected = evaluate(&reading.to_record(), &DetectionThresholds::default());
    let inputs: Vec<CreateAnomaly> = detected.into_iter().map(CreateAnomaly::from).collect();

    let summary = AnomalyRepo::insert_each(&pool, &inputs).await;
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.failed, 0);

    let stored = AnomalyRepo::list_recent(&pool, 10).await.unwrap();
    let kinds: Vec<&str> = stored.iter().map(|a| a.anomaly_type.as_str()).collect();
    // Same timestamp, so ties break on id descending.
    assert_eq!(
        kinds,
        vec!["error_flag_raised", "high_temperature", "low_production"]
    );
    assert_eq!(stored[2].value, Some(30.0));
    assert_eq!(
        stored[2].message.as_deref(),
        Some("Units produced (30) below threshold (50).")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rerunning_detection_duplicates_rows(pool: PgPool) {
    let input = CreateAnomaly {
        timestamp: Utc::now(),
        machine_id: "M1".to_string(),
        anomaly_type: AnomalyType::HighTemperature,
        value: Some(80.0),
        message: Some("Temperature (80) above 75 degrees.".to_string()),
    };

    AnomalyRepo::insert_each(&pool, std::slice::from_ref(&input)).await;
    AnomalyRepo::insert_each(&pool, std::slice::from_ref(&input)).await;

    assert_eq!(AnomalyRepo::count(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_recent_respects_limit_and_machine_filter(pool: PgPool) {
    for (i, machine) in ["M1", "M2", "M1", "M1"].iter().enumerate() {
        let input = CreateAnomaly {
            timestamp: Utc::now() - Duration::minutes(i as i64),
            machine_id: machine.to_string(),
            anomaly_type: AnomalyType::ErrorFlagRaised,
            value: Some(1.0),
            message: Some("Error flag raised.".to_string()),
        };
        AnomalyRepo::insert(&pool, &input).await.unwrap();
    }

    assert_eq!(AnomalyRepo::list_recent(&pool, 2).await.unwrap().len(), 2);

    let m1 = AnomalyRepo::list_for_machine(&pool, "M1", 10).await.unwrap();
    assert_eq!(m1.len(), 3);
    assert!(m1.iter().all(|a| a.machine_id == "M1"));
    assert!(m1.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_all_clears_table(pool: PgPool) {
    let input = CreateAnomaly {
        timestamp: Utc::now(),
        machine_id: "M1".to_string(),
        anomaly_type: AnomalyType::LowProduction,
        value: Some(10.0),
        message: None,
    };
    AnomalyRepo::insert(&pool, &input).await.unwrap();
    AnomalyRepo::insert(&pool, &input).await.unwrap();

    assert_eq!(AnomalyRepo::delete_all(&pool).await.unwrap(), 2);
    assert_eq!(AnomalyRepo::count(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Machines
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn machines_are_derived_from_readings_when_registry_empty(pool: PgPool) {
    ReadingRepo::insert(&pool, &new_reading("M2", 1, 70.0, 100)).await.unwrap();
    ReadingRepo::insert(&pool, &new_reading("M1", 2, 70.0, 100)).await.unwrap();
    ReadingRepo::insert(&pool, &new_reading("M2", 3, 70.0, 100)).await.unwrap();

    let machines = MachineRepo::list(&pool).await.unwrap();

    let ids: Vec<&str> = machines.iter().map(|m| m.machine_id.as_str()).collect();
    assert_eq!(ids, vec!["M1", "M2"]);
    assert_eq!(machines[0].name, "M1");
    assert_eq!(machines[0].location.as_deref(), Some("Factory Floor"));
    assert_eq!(machines[0].status, "online");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registry_takes_precedence_and_upsert_updates(pool: PgPool) {
    ReadingRepo::insert(&pool, &new_reading("M9", 1, 70.0, 100)).await.unwrap();

    let mut press = UpsertMachine {
        machine_id: "P1".to_string(),
        name: "Hydraulic Press".to_string(),
        location: Some("Bay 3".to_string()),
        status: MachineStatus::Online,
    };
    MachineRepo::upsert(&pool, &press).await.unwrap();

    press.status = MachineStatus::Maintenance;
    let updated = MachineRepo::upsert(&pool, &press).await.unwrap();
    assert_eq!(updated.status, "maintenance");

    let machines = MachineRepo::list(&pool).await.unwrap();
    assert_eq!(machines.len(), 1);
    assert_eq!(machines[0].machine_id, "P1");
}
