//! Message submission: validate, persist, notify, refresh.

use std::sync::Arc;

use tracing::{debug, info, warn};

use huddle_common::{ChatError, ParticipantId, StoreError};

use crate::protocol::OutboundIntent;
use crate::store::{ChatMessage, ChatStore, MessageDraft, MessageQuery, MessageView};
use crate::transport::TransportSession;

/// Outcome of one submission: the record the store created.
pub type SubmissionResult = Result<ChatMessage, ChatError>;

/// Trim `raw` and check it is postable.
pub fn validate_content(raw: &str, max_len: usize) -> Result<String, ChatError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ChatError::EmptyInput);
    }
    let len = content.chars().count();
    if len > max_len {
        return Err(ChatError::MessageTooLong { len, max: max_len });
    }
    Ok(content.to_string())
}

/// Turns submitted text into stored messages and keeps the cached view.
pub struct SubmissionPipeline {
    store: Arc<dyn ChatStore>,
    view: MessageView,
    max_len: usize,
}

impl SubmissionPipeline {
    pub fn new(store: Arc<dyn ChatStore>, query: MessageQuery, max_len: usize) -> Self {
        Self {
            store,
            view: MessageView::new(query),
            max_len,
        }
    }

    pub fn store(&self) -> &Arc<dyn ChatStore> {
        &self.store
    }

    /// Submit `raw` as a message from `author`.
    ///
    /// Nothing is published unless the store accepted the message. Once it
    /// has, the submission succeeds even if the `transmit` notification or
    /// the view refresh fails; both are logged.
    pub async fn submit(
        &mut self,
        raw: &str,
        author: &ParticipantId,
        transport: &TransportSession,
    ) -> SubmissionResult {
        let content = validate_content(raw, self.max_len)?;

        let draft = MessageDraft {
            author_id: author.clone(),
            content,
        };
        let message = self.store.create_message(draft).await.map_err(|e| {
            warn!(author = %author, error = %e, "failed to persist message");
            ChatError::Persistence(e)
        })?;
        info!(author = %author, record = %message.id, "message persisted");

        if let Err(e) = transport.publish(OutboundIntent::Transmit).await {
            warn!(record = %message.id, error = %e, "transmit notification not sent");
        }

        match self.refresh().await {
            Ok(()) => debug!(record = %message.id, "view refreshed after submit"),
            Err(e) => warn!(record = %message.id, error = %e, "message view refresh failed after submit"),
        }

        Ok(message)
    }

    /// Re-fetch the cached view from the store.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.view.refresh(self.store.as_ref()).await
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.view.messages()
    }

    pub fn view(&self) -> &MessageView {
        &self.view
    }
}
