//! Named JSON events sent over the push channel.
//!
//! Every frame is a text message of the form `{"event": <name>, "data": <payload>}`.

use axum::extract::ws::Message;
use chrono::Utc;
use intellifactory_core::types::Timestamp;
use serde::Serialize;

/// Sent once to each observer right after it connects.
pub const STATUS_EVENT: &str = "status";

/// Full dashboard snapshot pushed by the broadcast loop.
pub const LIVE_UPDATE_EVENT: &str = "liveupdate";

/// Greeting carried by the `status` event.
pub const CONNECTED_MESSAGE: &str = "Connected to Manufacturing Monitor";

/// An event envelope ready to be encoded as a text frame.
#[derive(Debug, Serialize)]
pub struct PushEvent<'a, T> {
    pub event: &'a str,
    pub data: T,
}

impl<'a, T: Serialize> PushEvent<'a, T> {
    pub fn new(event: &'a str, data: T) -> Self {
        Self { event, data }
    }

    /// Encode as a WebSocket text frame.
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}

/// Payload of the `status` event.
#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub msg: String,
    pub timestamp: Timestamp,
}

impl StatusPayload {
    pub fn connected() -> Self {
        Self {
            msg: CONNECTED_MESSAGE.to_string(),
            timestamp: Utc::now(),
        }
    }
}
