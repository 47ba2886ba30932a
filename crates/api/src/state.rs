use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: intellifactory_db::DbPool,
    /// Server configuration (query bounds, detection limits).
    pub config: Arc<ServerConfig>,
    /// Registry of connected dashboard observers.
    pub ws_manager: Arc<WsManager>,
}
