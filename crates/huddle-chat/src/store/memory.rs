//! In-process store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use huddle_common::{ParticipantId, RecordId, StoreError};

use super::document::StoreDocument;
use super::types::{ChatMessage, MessageDraft, MessageQuery, ParticipantRecord};
use super::ChatStore;

/// Store kept entirely in memory. Shared by cloning an `Arc` around it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RwLock<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages.
    pub async fn message_count(&self) -> usize {
        self.doc.read().await.messages.len()
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn create_message(&self, draft: MessageDraft) -> Result<ChatMessage, StoreError> {
        Ok(self.doc.write().await.insert_message(draft))
    }

    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.doc.read().await.query_messages(query))
    }

    async fn fetch_message(&self, id: &RecordId) -> Result<ChatMessage, StoreError> {
        self.doc.read().await.message(id)
    }

    async fn set_participant_active(
        &self,
        id: &ParticipantId,
        active: bool,
    ) -> Result<(), StoreError> {
        self.doc.write().await.set_active(id, active);
        Ok(())
    }

    async fn fetch_participant(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<ParticipantRecord>, StoreError> {
        Ok(self.doc.read().await.participant(id))
    }

    async fn fetch_active_participants(&self) -> Result<Vec<ParticipantId>, StoreError> {
        Ok(self.doc.read().await.active_participants())
    }
}
