//! Record types held by the durable store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use huddle_common::{ParticipantId, RecordId};

/// A stored chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: RecordId,
    pub author_id: ParticipantId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Content for a message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub author_id: ParticipantId,
    pub content: String,
}

impl MessageDraft {
    /// Materialize the draft as a stored record.
    pub(crate) fn into_message(self, id: RecordId, created_at: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            author_id: self.author_id,
            content: self.content,
            created_at,
        }
    }
}

/// Which messages to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Keep only the newest `limit` messages.
    pub limit: Option<usize>,
}

impl MessageQuery {
    pub fn latest(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Order `messages` oldest first and apply the limit.
    pub(crate) fn apply(&self, mut messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if let Some(limit) = self.limit {
            let skip = messages.len().saturating_sub(limit);
            messages.drain(..skip);
        }
        messages
    }
}

/// A participant's row: the active flag behind "is in the chat".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub participant_id: ParticipantId,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}
