use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, logs};
use crate::state::AppState;

/// ```text
/// GET /dashboard   -> get_dashboard
/// GET /logs        -> list_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/logs", get(logs::list_logs))
}
