use axum::extract::State;
use axum::Json;

use crate::snapshot::DashboardSnapshot;
use crate::state::AppState;

/// GET /api/dashboard
///
/// Returns the dashboard snapshot over the dashboard window. A database
/// failure still answers 200 with the degraded snapshot so the front end
/// can render its error banner.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    match DashboardSnapshot::load(&state.pool, &state.config.dashboard).await {
        Ok(snapshot) => {
            tracing::debug!(
                anomalies = snapshot.anomaly_count,
                machines = snapshot.machine_count,
                "Dashboard snapshot built"
            );
            Json(snapshot)
        }
        Err(e) => {
            tracing::error!(error = %e, "Dashboard query failed");
            Json(DashboardSnapshot::degraded(e))
        }
    }
}
