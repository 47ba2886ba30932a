use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// ```text
/// GET /system/health   -> system_health
/// GET /debug           -> debug_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/system/health", get(system::system_health))
        .route("/debug", get(system::debug_info))
}
