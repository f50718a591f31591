//! Room connection configuration types.

use serde::{Deserialize, Serialize};

/// Where and how to reach the room server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// WebSocket URL of the room server (`ws://` or `wss://`).
    pub endpoint: String,
    /// Name of the chat room to join.
    pub name: String,
    /// Keepalive ping interval in seconds.
    pub heartbeat_interval: u32,
    /// Base reconnect delay in seconds.
    pub reconnect_delay: u32,
    /// Upper bound for the exponential reconnect delay in seconds.
    pub max_reconnect_delay: u32,
    /// Connect timeout in seconds.
    pub connect_timeout: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8787".into(),
            name: "lobby".into(),
            heartbeat_interval: 25,
            reconnect_delay: 1,
            max_reconnect_delay: 30,
            connect_timeout: 15,
        }
    }
}
