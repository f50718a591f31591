//! Public handle for the room connection.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use huddle_common::TransportError;

use super::connection::connection_loop;
use super::types::{RoomClientConfig, RoomCommand};
use crate::protocol::OutboundIntent;
use crate::transport::{Transport, TransportEvent};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle for interacting with the room connection.
///
/// All methods send commands to the background connection task.
pub struct RoomClient {
    command_tx: mpsc::Sender<RoomCommand>,
    connected: Arc<RwLock<bool>>,
}

impl RoomClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: RoomClientConfig) -> (Self, mpsc::Receiver<TransportEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(RwLock::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }
}

#[async_trait]
impl Transport for RoomClient {
    async fn publish(&self, intent: OutboundIntent) -> Result<(), TransportError> {
        if !self.is_connected().await {
            return Err(TransportError::NotConnected);
        }
        self.command_tx
            .send(RoomCommand::Publish(intent))
            .await
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self) {
        let _ = self.command_tx.send(RoomCommand::Disconnect).await;
    }
}
