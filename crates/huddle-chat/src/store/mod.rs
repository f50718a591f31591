//! Durable message store.
//!
//! The store is the single source of truth for chat messages and the
//! participant roster. Sessions only append to it and always re-read from
//! it; nothing received over the wire is trusted as message content.

mod document;
mod file;
mod memory;
mod types;
mod view;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use types::{ChatMessage, MessageDraft, MessageQuery, ParticipantRecord};
pub use view::MessageView;

use async_trait::async_trait;
use huddle_common::{ParticipantId, RecordId, StoreError};

/// Capability the session needs from durable storage.
///
/// Concurrent writers are not coordinated client-side; each implementation
/// applies its own write semantics (last write wins for the bundled ones).
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist a new message and return the stored record.
    async fn create_message(&self, draft: MessageDraft) -> Result<ChatMessage, StoreError>;

    /// Messages matching `query`, oldest first.
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<ChatMessage>, StoreError>;

    async fn fetch_message(&self, id: &RecordId) -> Result<ChatMessage, StoreError>;

    /// Upsert the participant's active flag.
    async fn set_participant_active(
        &self,
        id: &ParticipantId,
        active: bool,
    ) -> Result<(), StoreError>;

    async fn fetch_participant(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<ParticipantRecord>, StoreError>;

    async fn fetch_active_participants(&self) -> Result<Vec<ParticipantId>, StoreError>;
}
