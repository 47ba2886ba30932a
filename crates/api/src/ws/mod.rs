//! WebSocket push channel for dashboard observers.
//!
//! Provides the observer registry, the JSON event envelope, heartbeat
//! monitoring and the HTTP upgrade handler used by Axum routes.

pub mod event;
mod handler;
mod heartbeat;
pub mod manager;

pub use event::PushEvent;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
