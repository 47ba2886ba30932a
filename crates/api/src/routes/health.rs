use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;
use crate::ws;

/// Root-level routes (not under `/api`).
///
/// ```text
/// GET /         service banner
/// GET /health   liveness + database reachability
/// GET /ws       push channel upgrade
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/ws", get(ws::ws_handler))
}
