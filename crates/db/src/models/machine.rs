//! Machine registry entity and DTOs.

use intellifactory_core::machine::MachineStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A machine, either registered explicitly or derived from readings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Machine {
    pub machine_id: String,
    pub name: String,
    pub location: Option<String>,
    pub status: String,
}

/// DTO for registering or updating a machine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertMachine {
    #[validate(length(min = 1, max = 50))]
    pub machine_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[serde(default)]
    pub status: MachineStatus,
}
