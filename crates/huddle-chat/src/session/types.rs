//! Settings, commands and the published view of a chat session.

use std::time::Duration;

use huddle_common::ParticipantId;

use super::notice::Notice;
use crate::store::ChatMessage;
use crate::transport::ConnectionState;

/// Tunables for one session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Quiet period that ends a typing burst.
    pub typing_quiet: Duration,
    /// How long a transient notice stays visible.
    pub notice_window: Duration,
    /// Newest messages kept in the view.
    pub history_limit: usize,
    pub max_message_length: usize,
    /// Enter the chat as soon as the session starts.
    pub auto_enter: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            typing_quiet: Duration::from_millis(1000),
            notice_window: Duration::from_millis(1000),
            history_limit: 100,
            max_message_length: 2000,
            auto_enter: false,
        }
    }
}

/// Requests from the UI to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// The draft changed (one raw input event).
    Input(String),
    Submit(String),
    EnterChat,
    LeaveChat,
    Shutdown,
}

/// Read-only projection of session state for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub me: ParticipantId,
    pub connection: ConnectionState,
    /// Oldest first, as the store returned them.
    pub messages: Vec<ChatMessage>,
    pub active_participants: Vec<ParticipantId>,
    pub in_chat: bool,
    pub local_typing: bool,
    pub remote_typing: bool,
    pub typing_peers: Vec<ParticipantId>,
    pub input: String,
    pub notice: Option<Notice>,
    pub server_time: Option<String>,
}

impl ChatView {
    pub fn empty(me: ParticipantId) -> Self {
        Self {
            me,
            connection: ConnectionState::Unconnected,
            messages: Vec::new(),
            active_participants: Vec::new(),
            in_chat: false,
            local_typing: false,
            remote_typing: false,
            typing_peers: Vec::new(),
            input: String::new(),
            notice: None,
            server_time: None,
        }
    }
}
