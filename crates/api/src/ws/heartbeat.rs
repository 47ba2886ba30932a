use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn a background task that pings every observer periodically so idle
/// connections stay open and dead ones surface as send errors.
///
/// The task runs for the process lifetime; abort the returned handle at
/// shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let pinged = ws_manager.ping_all().await;
            if pinged > 0 {
                tracing::trace!(pinged, "WebSocket heartbeat ping");
            }
        }
    })
}
