//! Periodic live-update broadcast.
//!
//! While at least one observer is connected, the loop rebuilds the dashboard
//! snapshot and pushes it to every observer as a `liveupdate` event. Failed
//! iterations are logged and the sleep doubles up to a cap; the next
//! successful iteration resets it to the base interval.

use std::sync::Arc;
use std::time::Duration;

use intellifactory_db::DbPool;

use crate::config::ServerConfig;
use crate::snapshot::{DashboardSnapshot, SnapshotWindow};
use crate::ws::event::{PushEvent, LIVE_UPDATE_EVENT};
use crate::ws::WsManager;

/// Timing and query bounds for the broadcast loop.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastSettings {
    /// Sleep after a successful (or skipped) iteration.
    pub interval: Duration,
    /// Upper bound on the sleep after repeated failures.
    pub max_backoff: Duration,
    pub window: SnapshotWindow,
}

impl BroadcastSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.broadcast_interval_secs),
            max_backoff: Duration::from_secs(config.broadcast_max_backoff_secs),
            window: config.live,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("snapshot query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode live update: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Double the current delay, clamped to `max`.
pub fn next_delay(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}

/// Spawn the broadcast loop. Abort the returned handle at shutdown.
pub fn start_broadcaster(
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    settings: BroadcastSettings,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(pool, ws_manager, settings))
}

/// Run the broadcast loop forever.
pub async fn run(pool: DbPool, ws_manager: Arc<WsManager>, settings: BroadcastSettings) {
    tracing::info!(
        interval_secs = settings.interval.as_secs(),
        max_backoff_secs = settings.max_backoff.as_secs(),
        "Live update broadcaster started"
    );

    let mut delay = settings.interval;
    loop {
        delay = match broadcast_once(&pool, &ws_manager, &settings.window).await {
            Ok(0) => settings.interval,
            Ok(delivered) => {
                tracing::debug!(delivered, "Broadcast live update");
                settings.interval
            }
            Err(e) => {
                let retry_in = next_delay(delay, settings.max_backoff);
                tracing::warn!(
                    error = %e,
                    retry_in_secs = retry_in.as_secs(),
                    "Live update broadcast failed"
                );
                retry_in
            }
        };
        tokio::time::sleep(delay).await;
    }
}

/// Build one snapshot and push it to all observers.
///
/// Skips the queries entirely when nobody is connected. Returns the number
/// of observers the update was queued for.
pub async fn broadcast_once(
    pool: &DbPool,
    ws_manager: &WsManager,
    window: &SnapshotWindow,
) -> Result<usize, BroadcastError> {
    if ws_manager.connection_count().await == 0 {
        return Ok(0);
    }

    let snapshot = DashboardSnapshot::load(pool, window).await?;
    let message = PushEvent::new(LIVE_UPDATE_EVENT, &snapshot).to_message()?;
    Ok(ws_manager.broadcast(message).await)
}
