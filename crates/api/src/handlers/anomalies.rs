use axum::extract::{Query, State};
use axum::Json;
use intellifactory_core::reading::validate_machine_id;
use intellifactory_db::models::anomaly::Anomaly;
use intellifactory_db::repositories::AnomalyRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Query params for `GET /api/anomalies`.
#[derive(Debug, Deserialize)]
pub struct AnomalyListQuery {
    /// Defaults to 50; must be within 1..=500.
    pub limit: Option<i64>,
    /// Only anomalies for this machine.
    pub machine_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// GET /api/anomalies
pub async fn list_anomalies(
    State(state): State<AppState>,
    Query(params): Query<AnomalyListQuery>,
) -> AppResult<Json<DataResponse<Vec<Anomaly>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let anomalies = match params.machine_id.as_deref() {
        Some(machine_id) => {
            validate_machine_id(machine_id)?;
            AnomalyRepo::list_for_machine(&state.pool, machine_id, limit).await?
        }
        None => AnomalyRepo::list_recent(&state.pool, limit).await?,
    };

    Ok(Json(DataResponse { data: anomalies }))
}

/// DELETE /api/anomalies -- remove every stored anomaly.
pub async fn delete_anomalies(State(state): State<AppState>) -> AppResult<Json<DeleteResponse>> {
    let deleted = AnomalyRepo::delete_all(&state.pool).await?;
    tracing::info!(deleted, "Anomalies cleared");
    Ok(Json(DeleteResponse { deleted }))
}
