//! One-time transport bootstrap.
//!
//! `ensure_initialized` loads the transport runtime and opens exactly one
//! connection no matter how many times or from how many tasks it is called.
//! A load failure is remembered and returned to every later caller.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use huddle_common::{new_correlation_id, ChatError};

use crate::transport::{Transport, TransportConnection, TransportEvent, TransportRuntime};

/// An open connection owned by one session.
pub struct SessionHandle {
    id: String,
    transport: Arc<dyn Transport>,
    listeners: StdMutex<Option<mpsc::Receiver<TransportEvent>>>,
}

impl SessionHandle {
    pub fn new(transport: Arc<dyn Transport>, events: mpsc::Receiver<TransportEvent>) -> Self {
        Self {
            id: new_correlation_id(),
            transport,
            listeners: StdMutex::new(Some(events)),
        }
    }

    /// Short correlation id for log lines.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Hand out the event receiver. Returns `Some` exactly once per handle.
    pub fn bind_listeners(&self) -> Option<mpsc::Receiver<TransportEvent>> {
        let mut slot = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let events = slot.take();
        if events.is_some() {
            debug!(handle = %self.id, "listeners bound");
        }
        events
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish()
    }
}

/// Lifecycle of the bootstrap.
#[derive(Debug, Clone, Default)]
pub enum BootState {
    #[default]
    Uninitialized,
    /// A load is in flight. Only observed later if that attempt was dropped.
    Initializing,
    Ready(Arc<SessionHandle>),
    Failed(String),
}

/// Serializes transport initialization for one session.
pub struct SessionBootstrap {
    runtime: Arc<dyn TransportRuntime>,
    state: Mutex<BootState>,
}

impl SessionBootstrap {
    pub fn new(runtime: Arc<dyn TransportRuntime>) -> Self {
        Self {
            runtime,
            state: Mutex::new(BootState::Uninitialized),
        }
    }

    pub async fn state(&self) -> BootState {
        self.state.lock().await.clone()
    }

    /// Load the runtime and open the connection, once.
    pub async fn ensure_initialized(&self) -> Result<Arc<SessionHandle>, ChatError> {
        let mut state = self.state.lock().await;

        match &*state {
            BootState::Ready(handle) => return Ok(Arc::clone(handle)),
            BootState::Failed(reason) => return Err(ChatError::TransportLoad(reason.clone())),
            BootState::Initializing => {
                warn!("previous bootstrap attempt was abandoned");
                let reason = "bootstrap interrupted".to_string();
                *state = BootState::Failed(reason.clone());
                return Err(ChatError::TransportLoad(reason));
            }
            BootState::Uninitialized => {}
        }

        *state = BootState::Initializing;
        info!("loading transport runtime");

        if let Err(e) = self.runtime.load().await {
            error!(error = %e, "transport runtime failed to load");
            let reason = e.to_string();
            *state = BootState::Failed(reason.clone());
            return Err(ChatError::TransportLoad(reason));
        }

        let TransportConnection { transport, events } = self.runtime.open();
        let handle = Arc::new(SessionHandle::new(transport, events));
        info!(handle = %handle.id(), "transport connection opened");
        *state = BootState::Ready(Arc::clone(&handle));
        Ok(handle)
    }
}
