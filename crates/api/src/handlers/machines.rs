use axum::extract::State;
use axum::Json;
use intellifactory_db::models::machine::{Machine, UpsertMachine};
use intellifactory_db::repositories::MachineRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/machines -- the registry, or machines derived from readings
/// when the registry is empty.
pub async fn list_machines(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Machine>>>> {
    let machines = MachineRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// POST /api/machines -- register a machine or update an existing one.
pub async fn upsert_machine(
    State(state): State<AppState>,
    Json(input): Json<UpsertMachine>,
) -> AppResult<Json<DataResponse<Machine>>> {
    input.validate()?;
    let machine = MachineRepo::upsert(&state.pool, &input).await?;
    tracing::info!(
        machine_id = %machine.machine_id,
        status = %machine.status,
        "Machine registered"
    );
    Ok(Json(DataResponse { data: machine }))
}
