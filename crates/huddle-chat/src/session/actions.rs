//! User-initiated session operations.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use huddle_common::{ChatError, ParticipantId};

use super::core::ChatSession;
use crate::pipeline::SubmissionResult;
use crate::protocol::OutboundIntent;
use crate::typing::TypingEdge;

impl ChatSession {
    /// Bootstrap the transport and load the initial room state.
    ///
    /// Safe to call more than once; the connection is only opened the first
    /// time. A transport load failure is returned and shown as a notice; it
    /// does not stop the store-backed parts of the session.
    pub async fn start(&mut self) -> Result<(), ChatError> {
        self.transport.begin_connecting();

        let result = match self.bootstrap.ensure_initialized().await {
            Ok(handle) => {
                if let Some(events) = self.transport.attach(handle) {
                    self.events = Some(events);
                }
                Ok(())
            }
            Err(e) => {
                self.transport.fail();
                self.notice.error(e.to_string());
                Err(e)
            }
        };

        self.resync().await;

        if result.is_ok() && self.settings.auto_enter && !self.presence.state().is_active(self.me())
        {
            if let Err(e) = self.enter_chat().await {
                warn!(error = %e, "auto-enter failed");
            }
        }

        self.publish_view();
        result
    }

    /// One raw input event with the current draft.
    pub async fn on_input(&mut self, text: String) {
        self.input = text;
        if self.typing.on_activity() == Some(TypingEdge::Started) {
            self.presence.set_local_typing(true);
            self.publish_intent(OutboundIntent::TypingStart).await;
        }
        self.publish_view();
    }

    /// The typing burst went quiet.
    pub(super) async fn on_typing_stopped(&mut self) {
        self.presence.set_local_typing(false);
        self.publish_intent(OutboundIntent::TypingStop).await;
        self.publish_view();
    }

    /// Post `text` as this participant.
    pub async fn submit(&mut self, text: &str) -> SubmissionResult {
        let author = self.me().clone();
        let result = self.pipeline.submit(text, &author, &self.transport).await;
        if let Err(e) = &result {
            self.notice.error(e.to_string());
        }
        self.publish_view();
        result
    }

    /// Mark this participant active in the room.
    pub async fn enter_chat(&mut self) -> Result<(), ChatError> {
        self.set_membership(true).await
    }

    /// Mark this participant inactive in the room.
    pub async fn leave_chat(&mut self) -> Result<(), ChatError> {
        self.set_membership(false).await
    }

    async fn set_membership(&mut self, active: bool) -> Result<(), ChatError> {
        let me = self.me().clone();
        if let Err(e) = self.pipeline.store().set_participant_active(&me, active).await {
            warn!(participant = %me, active, error = %e, "failed to persist membership");
            let err = ChatError::Persistence(e);
            self.notice.error(err.to_string());
            self.publish_view();
            return Err(err);
        }

        let intent = if active {
            self.presence.on_participant_joined(me.clone());
            OutboundIntent::ParticipantEntered
        } else {
            self.presence.on_participant_left(me.clone());
            OutboundIntent::ParticipantLeft
        };
        info!(participant = %me, active, "membership changed");
        self.publish_intent(intent).await;
        self.refresh_roster().await;
        self.publish_view();
        Ok(())
    }

    /// Publish an intent, logging instead of failing when the link is down.
    pub(super) async fn publish_intent(&self, intent: OutboundIntent) {
        if let Err(e) = self.transport.publish(intent).await {
            debug!(intent = intent.name(), error = %e, "intent not published");
        }
    }

    /// Re-fetch everything the room may have changed while we weren't
    /// listening.
    pub(super) async fn resync(&mut self) {
        self.presence.clear_remote_typing();
        self.refresh_messages().await;
        self.refresh_roster().await;
    }

    pub(super) async fn refresh_messages(&mut self) {
        if let Err(e) = self.pipeline.refresh().await {
            warn!(error = %e, "failed to refresh messages");
            self.notice.error(format!("Could not load messages: {e}"));
        }
    }

    pub(super) async fn refresh_roster(&mut self) {
        match self.pipeline.store().fetch_active_participants().await {
            Ok(active) => {
                let roster: BTreeSet<ParticipantId> = active.into_iter().collect();
                debug!(count = roster.len(), "roster refreshed");
                self.presence.replace_roster(roster);
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh participants");
                self.notice.error(format!("Could not load participants: {e}"));
            }
        }
    }
}
