use axum::routing::get;
use axum::Router;

use crate::handlers::anomalies;
use crate::state::AppState;

/// Routes mounted at `/anomalies`.
///
/// ```text
/// GET    /   -> list_anomalies (?limit, ?machine_id)
/// DELETE /   -> delete_anomalies
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(anomalies::list_anomalies).delete(anomalies::delete_anomalies),
    )
}
