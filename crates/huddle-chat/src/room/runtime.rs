//! Transport runtime backed by the WebSocket room client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use huddle_common::TransportError;

use super::client::RoomClient;
use super::types::RoomClientConfig;
use crate::transport::{TransportConnection, TransportRuntime};

/// Opens [`RoomClient`] connections for a fixed configuration.
#[derive(Debug, Clone)]
pub struct RoomRuntime {
    config: RoomClientConfig,
}

impl RoomRuntime {
    pub fn new(config: RoomClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoomClientConfig {
        &self.config
    }
}

#[async_trait]
impl TransportRuntime for RoomRuntime {
    async fn load(&self) -> Result<(), TransportError> {
        self.config.check()?;
        debug!(config = ?self.config, "room runtime loaded");
        Ok(())
    }

    fn open(&self) -> TransportConnection {
        info!(
            url = %self.config.display_endpoint(),
            room = %self.config.room,
            participant = %self.config.participant_id,
            "opening room connection"
        );
        let (client, events) = RoomClient::connect(self.config.clone());
        TransportConnection {
            transport: Arc::new(client),
            events,
        }
    }
}
