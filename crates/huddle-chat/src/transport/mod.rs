//! Transport abstraction: the live channel between a session and its room.
//!
//! `TransportRuntime` is what the bootstrap loads and opens; `Transport` is
//! the outbound half of an open connection and `TransportEvent`s arrive on
//! the receiver handed out with it.

mod state;

pub use state::{ConnectionState, TransportSession};

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use huddle_common::TransportError;

use crate::protocol::{InboundEvent, OutboundIntent};

/// Link-level status reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
    Error(String),
}

/// Everything a session can receive from its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Link(LinkStatus),
    Inbound(InboundEvent),
}

/// Outbound half of an open connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish one intent. At most once: nothing is queued or retried.
    async fn publish(&self, intent: OutboundIntent) -> Result<(), TransportError>;

    /// Close the connection and stop reconnecting.
    async fn close(&self);
}

/// A freshly opened connection: the outbound handle plus its event stream.
pub struct TransportConnection {
    pub transport: Arc<dyn Transport>,
    pub events: mpsc::Receiver<TransportEvent>,
}

/// Loads and opens transport connections.
#[async_trait]
pub trait TransportRuntime: Send + Sync {
    /// Make the runtime ready to open connections. A failure here is
    /// terminal for the session that asked.
    async fn load(&self) -> Result<(), TransportError>;

    /// Issue a connection attempt. Must be called from within a tokio runtime.
    fn open(&self) -> TransportConnection;
}
