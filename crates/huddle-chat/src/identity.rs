use serde::{Deserialize, Serialize};

use huddle_common::ParticipantId;

/// Who this session speaks as.
///
/// `authenticated` is false for fallback guest tokens, which are derived
/// from the wall clock and may collide.
#[derive(Clone, Serialize, Deserialize)]
pub struct Identity {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub authenticated: bool,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("participant_id", &self.participant_id.as_str())
            .field("display_name", &self.display_name)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

impl Identity {
    /// Resolve an identity from an optional provider-supplied id.
    ///
    /// Blank ids count as absent. Without an id a `guest-<millis>` token is
    /// generated; without a display name the participant id is shown.
    pub fn resolve(participant_id: Option<String>, display_name: Option<String>) -> Self {
        let supplied = participant_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let (participant_id, authenticated) = match supplied {
            Some(id) => (ParticipantId::new(id), true),
            None => (ParticipantId::guest(), false),
        };

        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| participant_id.to_string());

        Self {
            participant_id,
            display_name,
            authenticated,
        }
    }

    pub fn named(id: &str) -> Self {
        Self::resolve(Some(id.to_string()), None)
    }
}
