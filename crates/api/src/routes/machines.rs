use axum::routing::get;
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET  /   -> list_machines
/// POST /   -> upsert_machine
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(machines::list_machines).post(machines::upsert_machine),
    )
}
