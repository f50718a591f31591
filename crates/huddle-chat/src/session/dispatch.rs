//! Transport event dispatch.

use tracing::{debug, warn};

use super::core::ChatSession;
use crate::protocol::{InboundEvent, OutboundIntent};
use crate::transport::{LinkStatus, TransportEvent};

impl ChatSession {
    /// Apply one event from the transport, then publish the view.
    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Link(status) => self.handle_link(status).await,
            TransportEvent::Inbound(inbound) => self.handle_inbound(inbound).await,
        }
        self.publish_view();
    }

    async fn handle_link(&mut self, status: LinkStatus) {
        let came_up = self.transport.on_link(&status);
        match status {
            LinkStatus::Connected => {
                if came_up {
                    self.resync().await;
                    // Announcements made while the link was down were dropped.
                    if self.presence.state().is_active(self.me()) {
                        self.publish_intent(OutboundIntent::ParticipantEntered).await;
                    }
                }
            }
            LinkStatus::Disconnected => {
                self.presence.clear_remote_typing();
                self.notice.error("Disconnected from room");
            }
            LinkStatus::Error(message) => {
                self.notice.error(message);
            }
        }
    }

    async fn handle_inbound(&mut self, event: InboundEvent) {
        debug!(event = event.name(), "inbound event");
        match event {
            InboundEvent::Time(time) => {
                self.server_time = Some(time);
            }
            InboundEvent::RemoteTypingStart { participant_id } => {
                self.presence.on_remote_typing_signal(participant_id, true);
            }
            InboundEvent::RemoteTypingStop { participant_id } => {
                self.presence.on_remote_typing_signal(participant_id, false);
            }
            InboundEvent::MessageBroadcast { author_id, content } => {
                if let Err(e) = self
                    .pipeline
                    .submit(&content, &author_id, &self.transport)
                    .await
                {
                    warn!(author = %author_id, error = %e, "failed to store broadcast message");
                    self.notice.error(e.to_string());
                }
            }
            InboundEvent::Ack { ok, detail } => {
                self.input.clear();
                if ok {
                    self.notice.info(detail);
                } else {
                    self.notice.error(detail);
                }
            }
            InboundEvent::RoomUpdated => self.refresh_messages().await,
            InboundEvent::ParticipantsUpdated => self.refresh_roster().await,
        }
    }
}
