//! Connection state machine for the session's single transport handle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use huddle_common::TransportError;

use super::{LinkStatus, TransportEvent};
use crate::bootstrap::SessionHandle;
use crate::protocol::OutboundIntent;

/// Where the session's connection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Unconnected,
    /// Runtime loaded and a connection attempt issued.
    Connecting,
    /// Listeners bound and the link is up.
    Connected,
}

/// Owns the session's one transport handle and tracks its link state.
#[derive(Default)]
pub struct TransportSession {
    state: ConnectionState,
    handle: Option<Arc<SessionHandle>>,
}

impl TransportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn handle(&self) -> Option<&Arc<SessionHandle>> {
        self.handle.as_ref()
    }

    pub fn begin_connecting(&mut self) {
        if self.state == ConnectionState::Unconnected && self.handle.is_none() {
            self.state = ConnectionState::Connecting;
        }
    }

    /// Take ownership of `handle` and bind its listeners.
    ///
    /// Returns the event receiver only the first time a given handle is
    /// attached; attaching the same handle again binds nothing.
    pub fn attach(&mut self, handle: Arc<SessionHandle>) -> Option<mpsc::Receiver<TransportEvent>> {
        if let Some(current) = &self.handle {
            if Arc::ptr_eq(current, &handle) {
                debug!(handle = %handle.id(), "transport handle already attached");
                return None;
            }
            warn!(
                current = %current.id(),
                new = %handle.id(),
                "replacing attached transport handle"
            );
        }
        let events = handle.bind_listeners();
        self.handle = Some(handle);
        if self.state == ConnectionState::Unconnected {
            self.state = ConnectionState::Connecting;
        }
        events
    }

    /// Abandon the connection attempt (runtime failed to load).
    pub fn fail(&mut self) {
        self.state = ConnectionState::Unconnected;
    }

    /// Apply a link status. Returns `true` when the link just came up, so
    /// the caller can resynchronize with the store.
    pub fn on_link(&mut self, status: &LinkStatus) -> bool {
        match status {
            LinkStatus::Connected => {
                let was = self.state;
                if self.handle.is_some() {
                    self.state = ConnectionState::Connected;
                }
                info!(previous = ?was, "transport connected");
                was != ConnectionState::Connected && self.state == ConnectionState::Connected
            }
            LinkStatus::Disconnected => {
                if self.state != ConnectionState::Unconnected {
                    info!("transport disconnected");
                }
                self.state = ConnectionState::Unconnected;
                false
            }
            LinkStatus::Error(message) => {
                warn!(error = %message, "transport error");
                false
            }
        }
    }

    /// The event stream ended: the runtime will not reconnect this handle.
    pub fn on_events_closed(&mut self) {
        debug!("transport event stream closed");
        self.state = ConnectionState::Unconnected;
    }

    pub async fn publish(&self, intent: OutboundIntent) -> Result<(), TransportError> {
        let handle = self.handle.as_ref().ok_or(TransportError::NotConnected)?;
        handle.transport().publish(intent).await?;
        debug!(intent = intent.name(), "published");
        Ok(())
    }

    pub async fn close(&mut self) {
        if let Some(handle) = &self.handle {
            handle.transport().close().await;
        }
        self.state = ConnectionState::Unconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;

    fn handle() -> (Arc<SessionHandle>, mpsc::Sender<TransportEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let transport = Arc::new(MockTransport::default());
        (Arc::new(SessionHandle::new(transport, rx)), tx)
    }

    #[test]
    fn attach_binds_listeners_once() {
        let (handle, _tx) = handle();
        let mut session = TransportSession::new();
        assert!(session.attach(Arc::clone(&handle)).is_some());
        assert!(session.attach(handle).is_none());
        assert_eq!(session.state(), ConnectionState::Connecting);
    }

    #[test]
    fn link_lifecycle() {
        let (handle, _tx) = handle();
        let mut session = TransportSession::new();
        session.attach(handle);

        assert!(session.on_link(&LinkStatus::Connected));
        assert_eq!(session.state(), ConnectionState::Connected);
        assert!(!session.on_link(&LinkStatus::Connected));

        assert!(!session.on_link(&LinkStatus::Disconnected));
        assert_eq!(session.state(), ConnectionState::Unconnected);

        assert!(session.on_link(&LinkStatus::Connected));
    }

    #[test]
    fn link_up_without_handle_stays_unconnected() {
        let mut session = TransportSession::new();
        assert!(!session.on_link(&LinkStatus::Connected));
        assert_eq!(session.state(), ConnectionState::Unconnected);
    }

    #[tokio::test]
    async fn publish_without_handle_is_not_connected() {
        let session = TransportSession::new();
        let err = session.publish(OutboundIntent::Transmit).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }
}
