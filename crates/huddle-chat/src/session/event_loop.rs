//! The session's single-task event loop and teardown.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::core::ChatSession;
use super::types::SessionCommand;
use crate::protocol::OutboundIntent;
use crate::transport::TransportEvent;

async fn next_event(events: &mut Option<mpsc::Receiver<TransportEvent>>) -> Option<TransportEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl ChatSession {
    /// Drive the session until `Shutdown` arrives or the command channel
    /// closes. Call [`ChatSession::start`] first.
    ///
    /// UI commands, transport events, the typing deadline and the notice
    /// deadline are handled one at a time, in arrival order.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        info!(participant = %self.me(), "session loop started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                event = next_event(&mut self.events) => match event {
                    Some(event) => self.handle_transport_event(event).await,
                    None => {
                        self.events = None;
                        self.transport.on_events_closed();
                        self.presence.clear_remote_typing();
                        self.publish_view();
                    }
                },
                _ = self.typing.quiet() => self.on_typing_stopped().await,
                _ = self.notice.expired() => self.publish_view(),
            }
        }
        self.shutdown().await;
        info!(participant = %self.me(), "session loop stopped");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        debug!(command = ?command, "session command");
        // Failures already surface as notices.
        match command {
            SessionCommand::Input(text) => self.on_input(text).await,
            SessionCommand::Submit(text) => {
                let _ = self.submit(&text).await;
            }
            SessionCommand::EnterChat => {
                let _ = self.enter_chat().await;
            }
            SessionCommand::LeaveChat => {
                let _ = self.leave_chat().await;
            }
            SessionCommand::Shutdown => {}
        }
    }

    /// Tear the session down: end any typing burst, drop pending deadlines
    /// and close the transport.
    pub async fn shutdown(&mut self) {
        if self.typing.cancel() {
            self.presence.set_local_typing(false);
            self.publish_intent(OutboundIntent::TypingStop).await;
        }
        self.notice.cancel();
        self.transport.close().await;
        self.events = None;
        self.publish_view();
    }
}
