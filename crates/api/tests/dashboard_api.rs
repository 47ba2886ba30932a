//! Integration tests for the dashboard, logs, ingest and CRUD endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, delete, get, post_json};
use serde_json::json;
use sqlx::PgPool;

/// Ingest one reading `minutes_ago` minutes in the past.
async fn ingest(
    pool: &PgPool,
    machine_id: &str,
    minutes_ago: i64,
    temperature: f64,
    units: i32,
    error_flag: bool,
) -> serde_json::Value {
    let timestamp = Utc::now() - Duration::minutes(minutes_ago);
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/readings",
        json!({
            "machine_id": machine_id,
            "timestamp": timestamp,
            "temperature": temperature,
            "units_produced": units,
            "error_flag": error_flag,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: empty database yields zero counts and placeholder charts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_on_empty_database(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/dashboard").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["anomalyCount"], 0);
    assert_eq!(json["machineCount"], 0);
    assert_eq!(json["recentAnomalies"], json!([]));
    assert_eq!(json["recentReadings"], json!([]));
    assert_eq!(json["temperatureData"]["labels"], json!([]));
    assert_eq!(json["temperatureData"]["datasets"][0]["label"], "Temperature");
    assert_eq!(json["productionData"]["datasets"][0]["label"], "Production");
    assert_eq!(json["status"], "ok");
    assert!(json.get("error").is_none());
}

// ---------------------------------------------------------------------------
// Test: POST /api/readings stores the reading and all three anomalies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingest_reading_with_all_conditions_yields_three_anomalies(pool: PgPool) {
    let json = ingest(&pool, "M5", 1, 90.0, 30, true).await;

    assert_eq!(json["reading"]["machine_id"], "M5");
    let anomalies = json["anomalies"].as_array().unwrap();
    let kinds: Vec<&str> = anomalies
        .iter()
        .map(|a| a["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["low_production", "high_temperature", "error_flag_raised"]
    );
    assert_eq!(anomalies[0]["value"], 30.0);
    assert_eq!(anomalies[1]["value"], 90.0);
    assert_eq!(anomalies[2]["value"], 1.0);
}

// ---------------------------------------------------------------------------
// Test: a normal reading produces no anomalies; timestamp defaults to now
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingest_normal_reading_without_timestamp(pool: PgPool) {
    let before = Utc::now();
    let response = post_json(
        common::build_test_app(pool),
        "/api/readings",
        json!({"machine_id": "M1", "temperature": 75.0, "units_produced": 50}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["anomalies"], json!([]));
    assert_eq!(json["reading"]["error_flag"], false);
    let stored: chrono::DateTime<Utc> =
        serde_json::from_value(json["reading"]["timestamp"].clone()).unwrap();
    assert!(stored >= before - Duration::seconds(1));
}

// ---------------------------------------------------------------------------
// Test: invalid ingest payloads are rejected with VALIDATION_ERROR
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingest_rejects_blank_machine_id(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/readings",
        json!({"machine_id": "   ", "temperature": 70.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingest_rejects_negative_units(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/readings",
        json!({"machine_id": "M1", "units_produced": -5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: dashboard reflects ingested data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_reflects_ingested_readings(pool: PgPool) {
    ingest(&pool, "M1", 3, 60.0, 80, false).await;
    ingest(&pool, "M2", 2, 70.0, 40, false).await;
    ingest(&pool, "M3", 1, 85.0, 90, false).await;

    let json = body_json(get(common::build_test_app(pool), "/api/dashboard").await).await;

    assert_eq!(json["machineCount"], 3);
    assert_eq!(json["anomalyCount"], 2);
    assert_eq!(json["recentAnomalies"][0]["machine_id"], "M3");
    assert_eq!(json["recentAnomalies"][0]["type"], "high_temperature");
    assert_eq!(json["recentReadings"].as_array().unwrap().len(), 3);
    assert_eq!(json["recentReadings"][0]["machine_id"], "M3");

    let datasets = json["temperatureData"]["datasets"].as_array().unwrap();
    let labels: Vec<&str> = datasets.iter().map(|d| d["label"].as_str().unwrap()).collect();
    assert_eq!(
        labels,
        vec!["M1 Temperature", "M2 Temperature", "M3 Temperature"]
    );
    assert_eq!(json["productionData"]["datasets"][0]["label"], "M1 Production");
}

// ---------------------------------------------------------------------------
// Test: GET /api/logs derives status from the error flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn logs_mark_flagged_readings_as_anomaly(pool: PgPool) {
    ingest(&pool, "M1", 2, 60.0, 80, false).await;
    ingest(&pool, "M2", 1, 60.0, 80, true).await;

    let json = body_json(get(common::build_test_app(pool), "/api/logs").await).await;

    assert!(json.get("error").is_none());
    let logs = json["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["machine_id"], "M2");
    assert_eq!(logs[0]["status"], "anomaly");
    assert_eq!(logs[1]["status"], "normal");
}

// ---------------------------------------------------------------------------
// Test: anomalies can be filtered, then cleared
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn anomalies_filter_and_bulk_delete(pool: PgPool) {
    ingest(&pool, "M1", 2, 90.0, 10, false).await;
    ingest(&pool, "M2", 1, 60.0, 80, true).await;

    let all = body_json(get(common::build_test_app(pool.clone()), "/api/anomalies").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let m1 = body_json(
        get(
            common::build_test_app(pool.clone()),
            "/api/anomalies?machine_id=M1&limit=1",
        )
        .await,
    )
    .await;
    let m1 = m1["data"].as_array().unwrap();
    assert_eq!(m1.len(), 1);
    assert_eq!(m1[0]["machine_id"], "M1");

    let response = delete(common::build_test_app(pool.clone()), "/api/anomalies").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], 3);

    let after = body_json(get(common::build_test_app(pool), "/api/anomalies").await).await;
    assert_eq!(after["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Test: out-of-range limit and hours are rejected with 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_query_params_are_rejected(pool: PgPool) {
    for uri in [
        "/api/anomalies?limit=0",
        "/api/anomalies?limit=501",
        "/api/readings?hours=0",
        "/api/readings?hours=-3",
    ] {
        let response = get(common::build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST", "{uri}");
    }

    let response = get(common::build_test_app(pool), "/api/anomalies?limit=500").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: GET /api/readings falls back to the latest readings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn readings_window_falls_back_to_latest(pool: PgPool) {
    ingest(&pool, "M1", 60 * 48, 70.0, 100, false).await;

    let json = body_json(get(common::build_test_app(pool), "/api/readings?hours=1").await).await;

    let readings = json["data"].as_array().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["machine_id"], "M1");
}

// ---------------------------------------------------------------------------
// Test: machines are derived from readings until registered
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn machines_derived_then_registered(pool: PgPool) {
    ingest(&pool, "M1", 1, 70.0, 100, false).await;

    let derived = body_json(get(common::build_test_app(pool.clone()), "/api/machines").await).await;
    assert_eq!(derived["data"][0]["machine_id"], "M1");
    assert_eq!(derived["data"][0]["location"], "Factory Floor");
    assert_eq!(derived["data"][0]["status"], "online");

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/machines",
        json!({"machine_id": "P1", "name": "Press", "status": "maintenance"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "maintenance");

    let registered = body_json(get(common::build_test_app(pool), "/api/machines").await).await;
    let machines = registered["data"].as_array().unwrap();
    assert_eq!(machines.len(), 1);
    assert_eq!(machines[0]["machine_id"], "P1");
}

// ---------------------------------------------------------------------------
// Test: GET /api/debug reports counts and samples
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn debug_reports_counts(pool: PgPool) {
    ingest(&pool, "M1", 2, 70.0, 100, false).await;
    ingest(&pool, "M2", 1, 80.0, 100, false).await;

    let json = body_json(get(common::build_test_app(pool), "/api/debug").await).await;

    assert_eq!(json["readings_count"], 2);
    assert_eq!(json["anomalies_count"], 1);
    assert_eq!(json["machines_count"], 2);
    assert_eq!(json["sample_reading"]["machine_id"], "M2");
    assert_eq!(json["sample_anomaly"]["type"], "high_temperature");
    assert!(json["reading_range"]["earliest"].is_string());
}
