use std::fmt::Display;
use std::str::FromStr;

use intellifactory_core::detector::DetectionThresholds;

use crate::snapshot::SnapshotWindow;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base sleep between live updates (default: `5`).
    pub broadcast_interval_secs: u64,
    /// Cap on the broadcast sleep after repeated failures (default: `60`).
    pub broadcast_max_backoff_secs: u64,
    /// Query bounds for `GET /api/dashboard` and `GET /api/logs`.
    pub dashboard: SnapshotWindow,
    /// Query bounds for the `liveupdate` push.
    pub live: SnapshotWindow,
    /// Limits applied by `POST /api/readings`.
    pub thresholds: DetectionThresholds,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `5000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `BROADCAST_INTERVAL_SECS`    | `5`                     |
    /// | `BROADCAST_MAX_BACKOFF_SECS` | `60`                    |
    /// | `DASHBOARD_ANOMALY_LIMIT`    | `5`                     |
    /// | `DASHBOARD_WINDOW_HOURS`     | `24`                    |
    /// | `LIVE_ANOMALY_LIMIT`         | `10`                    |
    /// | `LIVE_WINDOW_HOURS`          | `1`                     |
    /// | `READINGS_FALLBACK_LIMIT`    | `50`                    |
    /// | `RECENT_READINGS_LIMIT`      | `10`                    |
    ///
    /// Detection limits come from [`DetectionThresholds::from_env`]; an
    /// unparsable override panics too.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);
        let broadcast_interval_secs: u64 = env_or("BROADCAST_INTERVAL_SECS", 5);
        let broadcast_max_backoff_secs: u64 = env_or("BROADCAST_MAX_BACKOFF_SECS", 60);
        assert!(
            broadcast_interval_secs > 0,
            "BROADCAST_INTERVAL_SECS must be greater than zero"
        );

        let fallback_limit: i64 = env_or("READINGS_FALLBACK_LIMIT", 50);
        let recent_readings_limit: usize = env_or("RECENT_READINGS_LIMIT", 10);

        let dashboard = SnapshotWindow {
            anomaly_limit: env_or("DASHBOARD_ANOMALY_LIMIT", 5),
            window_hours: env_or("DASHBOARD_WINDOW_HOURS", 24),
            fallback_limit,
            recent_readings_limit,
        };
        let live = SnapshotWindow {
            anomaly_limit: env_or("LIVE_ANOMALY_LIMIT", 10),
            window_hours: env_or("LIVE_WINDOW_HOURS", 1),
            fallback_limit,
            recent_readings_limit,
        };
        for (name, window) in [("DASHBOARD_WINDOW_HOURS", &dashboard), ("LIVE_WINDOW_HOURS", &live)] {
            assert!(
                (1..=SnapshotWindow::MAX_WINDOW_HOURS).contains(&window.window_hours),
                "{name} must be between 1 and {}",
                SnapshotWindow::MAX_WINDOW_HOURS
            );
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            broadcast_interval_secs,
            broadcast_max_backoff_secs: broadcast_max_backoff_secs.max(broadcast_interval_secs),
            dashboard,
            live,
            thresholds: DetectionThresholds::from_env().unwrap_or_else(|e| panic!("{e}")),
        }
    }
}

/// Read `name` from the environment, falling back to `default` when unset.
///
/// Panics if the variable is set but does not parse; misconfiguration
/// should stop the server at startup.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value: {e}")),
        Err(_) => default,
    }
}
