//! Cached query view over the store.

use huddle_common::StoreError;
use tracing::debug;

use super::types::{ChatMessage, MessageQuery};
use super::ChatStore;

/// Local cache of one message query.
///
/// The cache only changes through [`MessageView::refresh`], which replaces
/// it wholesale with what the store returns. It is never appended to in
/// place, so its order always matches the store's.
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    query: MessageQuery,
    messages: Vec<ChatMessage>,
    refreshes: u64,
}

impl MessageView {
    pub fn new(query: MessageQuery) -> Self {
        Self {
            query,
            messages: Vec::new(),
            refreshes: 0,
        }
    }

    /// Re-fetch the query from the store.
    pub async fn refresh(&mut self, store: &dyn ChatStore) -> Result<(), StoreError> {
        let messages = store.fetch_messages(&self.query).await?;
        debug!(count = messages.len(), "message view refreshed");
        self.messages = messages;
        self.refreshes += 1;
        Ok(())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of successful refreshes so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub fn query(&self) -> &MessageQuery {
        &self.query
    }
}
