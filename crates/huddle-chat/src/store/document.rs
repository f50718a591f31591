//! Store contents shared by the bundled implementations.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use huddle_common::{ParticipantId, RecordId, StoreError};

use super::types::{ChatMessage, MessageDraft, MessageQuery, ParticipantRecord};

/// Everything a bundled store persists. Serialized as-is by
/// [`super::JsonFileStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreDocument {
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) participants: BTreeMap<ParticipantId, ParticipantRecord>,
}

impl StoreDocument {
    pub(crate) fn insert_message(&mut self, draft: MessageDraft) -> ChatMessage {
        let message = draft.into_message(RecordId::new(), Utc::now());
        self.messages.push(message.clone());
        message
    }

    pub(crate) fn query_messages(&self, query: &MessageQuery) -> Vec<ChatMessage> {
        query.apply(self.messages.clone())
    }

    pub(crate) fn message(&self, id: &RecordId) -> Result<ChatMessage, StoreError> {
        self.messages
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub(crate) fn set_active(&mut self, id: &ParticipantId, active: bool) {
        self.participants.insert(
            id.clone(),
            ParticipantRecord {
                participant_id: id.clone(),
                active,
                updated_at: Utc::now(),
            },
        );
    }

    pub(crate) fn participant(&self, id: &ParticipantId) -> Option<ParticipantRecord> {
        self.participants.get(id).cloned()
    }

    pub(crate) fn active_participants(&self) -> Vec<ParticipantId> {
        self.participants
            .values()
            .filter(|p| p.active)
            .map(|p| p.participant_id.clone())
            .collect()
    }
}
