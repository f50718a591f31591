//! In-crate doubles for the transport and store seams.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use huddle_common::{ParticipantId, RecordId, StoreError, TransportError};

use crate::bootstrap::SessionHandle;
use crate::protocol::OutboundIntent;
use crate::store::{ChatMessage, ChatStore, MessageDraft, MessageQuery, ParticipantRecord};
use crate::transport::{Transport, TransportConnection, TransportEvent, TransportRuntime, TransportSession};

/// Records every published intent.
#[derive(Default)]
pub struct MockTransport {
    published: Mutex<Vec<OutboundIntent>>,
    closed: AtomicBool,
    offline: AtomicBool,
}

impl MockTransport {
    /// Rejects publishes with `NotConnected` until [`Self::set_online`].
    pub fn offline() -> Self {
        let transport = Self::default();
        transport.offline.store(true, Ordering::SeqCst);
        transport
    }

    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<OutboundIntent> {
        self.published.lock().unwrap().clone()
    }

    pub fn count(&self, intent: OutboundIntent) -> usize {
        self.published().iter().filter(|i| **i == intent).count()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn publish(&self, intent: OutboundIntent) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.published.lock().unwrap().push(intent);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// A transport session already attached to a mock handle.
pub fn attached_transport() -> (TransportSession, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::default());
    let (_tx, rx) = mpsc::channel(8);
    let mut session = TransportSession::new();
    session.attach(Arc::new(SessionHandle::new(mock.clone(), rx)));
    (session, mock)
}

/// Runtime that counts loads and opens and hands out a shared mock transport.
pub struct MockRuntime {
    fail_load: Option<String>,
    loads: AtomicUsize,
    opens: AtomicUsize,
    transport: Arc<MockTransport>,
    sender: Mutex<Option<mpsc::Sender<TransportEvent>>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            fail_load: None,
            loads: AtomicUsize::new(0),
            opens: AtomicUsize::new(0),
            transport: Arc::new(MockTransport::default()),
            sender: Mutex::new(None),
        }
    }

    /// Runtime whose transport starts with the link down.
    pub fn offline() -> Self {
        Self {
            transport: Arc::new(MockTransport::offline()),
            ..Self::new()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_load: Some(reason.to_string()),
            ..Self::new()
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn transport(&self) -> Arc<MockTransport> {
        Arc::clone(&self.transport)
    }

    /// Sender feeding the most recently opened connection.
    pub fn events(&self) -> mpsc::Sender<TransportEvent> {
        self.sender
            .lock()
            .unwrap()
            .clone()
            .expect("no connection opened")
    }
}

#[async_trait]
impl TransportRuntime for MockRuntime {
    async fn load(&self) -> Result<(), TransportError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.fail_load {
            Some(reason) => Err(TransportError::InvalidEndpoint(reason.clone())),
            None => Ok(()),
        }
    }

    fn open(&self) -> TransportConnection {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(64);
        *self.sender.lock().unwrap() = Some(tx);
        TransportConnection {
            transport: self.transport.clone(),
            events: rx,
        }
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("store offline".into())
}

#[async_trait]
impl ChatStore for FailingStore {
    async fn create_message(&self, _draft: MessageDraft) -> Result<ChatMessage, StoreError> {
        Err(unavailable())
    }

    async fn fetch_messages(&self, _query: &MessageQuery) -> Result<Vec<ChatMessage>, StoreError> {
        Err(unavailable())
    }

    async fn fetch_message(&self, _id: &RecordId) -> Result<ChatMessage, StoreError> {
        Err(unavailable())
    }

    async fn set_participant_active(
        &self,
        _id: &ParticipantId,
        _active: bool,
    ) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn fetch_participant(
        &self,
        _id: &ParticipantId,
    ) -> Result<Option<ParticipantRecord>, StoreError> {
        Err(unavailable())
    }

    async fn fetch_active_participants(&self) -> Result<Vec<ParticipantId>, StoreError> {
        Err(unavailable())
    }
}
