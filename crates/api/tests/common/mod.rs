#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use intellifactory_core::detector::DetectionThresholds;
use sqlx::PgPool;
use tower::ServiceExt;

use intellifactory_api::config::ServerConfig;
use intellifactory_api::router::build_app_router;
use intellifactory_api::snapshot::SnapshotWindow;
use intellifactory_api::state::AppState;
use intellifactory_api::ws::WsManager;

/// Build a test `ServerConfig` with the production defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        broadcast_interval_secs: 5,
        broadcast_max_backoff_secs: 60,
        dashboard: SnapshotWindow {
            anomaly_limit: 5,
            window_hours: 24,
            fallback_limit: 50,
            recent_readings_limit: 10,
        },
        live: SnapshotWindow {
            anomaly_limit: 10,
            window_hours: 1,
            fallback_limit: 50,
            recent_readings_limit: 10,
        },
        thresholds: DetectionThresholds::default(),
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(WsManager::new()))
}

/// Like [`build_test_app`] but sharing a caller-owned observer registry.
pub fn build_test_app_with(pool: PgPool, ws_manager: Arc<WsManager>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager,
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
