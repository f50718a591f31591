//! ChatSession struct definition and constructor.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use huddle_common::ParticipantId;

use super::notice::NoticeBoard;
use super::types::{ChatView, SessionSettings};
use crate::bootstrap::SessionBootstrap;
use crate::identity::Identity;
use crate::pipeline::SubmissionPipeline;
use crate::presence::PresenceTracker;
use crate::store::{ChatStore, MessageQuery};
use crate::transport::{TransportEvent, TransportRuntime, TransportSession};
use crate::typing::TypingDebouncer;

/// One participant's session in a chat room.
pub struct ChatSession {
    pub(super) identity: Identity,
    pub(super) settings: SessionSettings,

    // Transport
    pub(super) bootstrap: SessionBootstrap,
    pub(super) transport: TransportSession,
    pub(super) events: Option<mpsc::Receiver<TransportEvent>>,

    // Local state
    pub(super) presence: PresenceTracker,
    pub(super) pipeline: SubmissionPipeline,
    pub(super) typing: TypingDebouncer,
    pub(super) notice: NoticeBoard,
    pub(super) input: String,
    pub(super) server_time: Option<String>,

    pub(super) view_tx: watch::Sender<ChatView>,
}

impl ChatSession {
    pub fn new(
        identity: Identity,
        settings: SessionSettings,
        runtime: Arc<dyn TransportRuntime>,
        store: Arc<dyn ChatStore>,
    ) -> (Self, watch::Receiver<ChatView>) {
        let me = identity.participant_id.clone();
        let (view_tx, view_rx) = watch::channel(ChatView::empty(me.clone()));

        let session = Self {
            bootstrap: SessionBootstrap::new(runtime),
            transport: TransportSession::new(),
            events: None,
            presence: PresenceTracker::new(me),
            pipeline: SubmissionPipeline::new(
                store,
                MessageQuery::latest(settings.history_limit),
                settings.max_message_length,
            ),
            typing: TypingDebouncer::new(settings.typing_quiet),
            notice: NoticeBoard::new(settings.notice_window),
            input: String::new(),
            server_time: None,
            identity,
            settings,
            view_tx,
        };

        (session, view_rx)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub(super) fn me(&self) -> &ParticipantId {
        &self.identity.participant_id
    }

    /// Project the current state.
    pub fn view(&self) -> ChatView {
        let presence = self.presence.state();
        ChatView {
            me: self.me().clone(),
            connection: self.transport.state(),
            messages: self.pipeline.messages().to_vec(),
            active_participants: presence.active_participants.iter().cloned().collect(),
            in_chat: presence.is_active(self.me()),
            local_typing: presence.local_typing,
            remote_typing: presence.remote_typing(),
            typing_peers: presence.typing_peers.iter().cloned().collect(),
            input: self.input.clone(),
            notice: self.notice.current().cloned(),
            server_time: self.server_time.clone(),
        }
    }

    pub(super) fn publish_view(&self) {
        self.view_tx.send_replace(self.view());
    }
}
