//! Chat session behavior configuration types.

use serde::{Deserialize, Serialize};

/// Timing and limits for the chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period in milliseconds before "stopped typing" is signaled.
    pub typing_quiet_ms: u32,
    /// How long transient success/error text stays visible, in milliseconds.
    pub notice_window_ms: u32,
    /// Number of most recent messages kept in the local view.
    pub history_limit: u32,
    /// Maximum characters accepted per message.
    pub max_message_length: u32,
    /// Announce this participant as active right after connecting.
    pub auto_enter: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_quiet_ms: 1000,
            notice_window_ms: 1000,
            history_limit: 100,
            max_message_length: 2000,
            auto_enter: false,
        }
    }
}
