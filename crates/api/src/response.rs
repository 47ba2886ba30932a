//! Shared response envelope for the CRUD endpoints.
//!
//! Dashboard, logs and health payloads have fixed shapes consumed by the
//! front end; everything else under `/api` is wrapped in `{ "data": ... }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
