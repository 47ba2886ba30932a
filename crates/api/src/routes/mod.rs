pub mod anomalies;
pub mod dashboard;
pub mod health;
pub mod machines;
pub mod readings;
pub mod system;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /dashboard              snapshot (GET)
/// /logs                   readings log (GET)
///
/// /system/health          database + push channel status (GET)
/// /debug                  table counts and samples (GET)
///
/// /anomalies              list (GET), clear (DELETE)
/// /readings               list (GET), ingest (POST)
/// /machines               list (GET), upsert (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(system::router())
        .nest("/anomalies", anomalies::router())
        .nest("/readings", readings::router())
        .nest("/machines", machines::router())
}
