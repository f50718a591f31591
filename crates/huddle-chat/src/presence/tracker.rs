//! Presence tracker bound to the local participant.

use std::collections::BTreeSet;

use huddle_common::ParticipantId;
use tracing::debug;

use super::state::{transition, PresenceChange, PresenceState};

/// Owns the session's [`PresenceState`] and is its only writer.
#[derive(Debug)]
pub struct PresenceTracker {
    me: ParticipantId,
    state: PresenceState,
}

impl PresenceTracker {
    pub fn new(me: ParticipantId) -> Self {
        Self {
            me,
            state: PresenceState::default(),
        }
    }

    pub fn me(&self) -> &ParticipantId {
        &self.me
    }

    pub fn state(&self) -> &PresenceState {
        &self.state
    }

    pub fn apply(&mut self, change: PresenceChange) {
        let current = std::mem::take(&mut self.state);
        self.state = transition(current, change, &self.me);
    }

    /// Set by the typing debouncer's edges, never by raw keystrokes.
    pub fn set_local_typing(&mut self, typing: bool) {
        self.apply(PresenceChange::LocalTyping(typing));
    }

    pub fn on_remote_typing_signal(&mut self, participant: ParticipantId, typing: bool) {
        if participant == self.me {
            debug!(participant = %participant, "ignoring typing echo for self");
            return;
        }
        self.apply(PresenceChange::RemoteTyping {
            participant,
            typing,
        });
    }

    pub fn on_participant_joined(&mut self, id: ParticipantId) {
        self.apply(PresenceChange::Joined(id));
    }

    pub fn on_participant_left(&mut self, id: ParticipantId) {
        self.apply(PresenceChange::Left(id));
    }

    pub fn replace_roster(&mut self, roster: BTreeSet<ParticipantId>) {
        self.apply(PresenceChange::Roster(roster));
    }

    /// Forget every peer's typing flag, e.g. after the link dropped and
    /// their stop signals may have been missed.
    pub fn clear_remote_typing(&mut self) {
        self.state.typing_peers.clear();
    }
}
