//! Client configuration and the command channel to the connection task.

use huddle_common::{ParticipantId, TransportError};

use crate::protocol::{OutboundIntent, RoomHello};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where and as whom to connect.
#[derive(Clone)]
pub struct RoomClientConfig {
    /// `ws://` or `wss://` URL of the room server.
    pub endpoint: String,
    pub room: String,
    pub participant_id: ParticipantId,
    pub heartbeat_interval_secs: u64,
    pub reconnect_delay_secs: u64,
    pub max_reconnect_delay_secs: u64,
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for RoomClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomClientConfig")
            .field("endpoint", &self.display_endpoint())
            .field("room", &self.room)
            .field("participant_id", &self.participant_id.as_str())
            .field("heartbeat_interval_secs", &self.heartbeat_interval_secs)
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("max_reconnect_delay_secs", &self.max_reconnect_delay_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for RoomClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8787".to_string(),
            room: "lobby".to_string(),
            participant_id: ParticipantId::guest(),
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}

impl RoomClientConfig {
    /// Endpoint without its query string, safe for logs.
    pub(crate) fn display_endpoint(&self) -> &str {
        self.endpoint.split('?').next().unwrap_or("")
    }

    pub(crate) fn hello(&self) -> RoomHello {
        RoomHello {
            room: self.room.clone(),
            participant_id: self.participant_id.clone(),
        }
    }

    /// Check the settings are usable before any connection is attempted.
    pub fn check(&self) -> Result<(), TransportError> {
        let endpoint = self.endpoint.trim();
        let rest = endpoint
            .strip_prefix("wss://")
            .or_else(|| endpoint.strip_prefix("ws://"));
        match rest {
            None => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "expected ws:// or wss:// URL, got '{}'",
                    self.display_endpoint()
                )))
            }
            Some(host) if host.is_empty() => {
                return Err(TransportError::InvalidEndpoint("missing host".into()))
            }
            Some(_) => {}
        }
        if self.room.trim().is_empty() {
            return Err(TransportError::InvalidEndpoint("room name is empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Commands sent from [`super::RoomClient`] to the connection task.
#[derive(Debug)]
pub(crate) enum RoomCommand {
    Publish(OutboundIntent),
    Disconnect,
}
