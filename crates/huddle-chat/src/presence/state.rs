//! Presence value type and its transition function.

use std::collections::BTreeSet;

use huddle_common::ParticipantId;

/// Local view of typing activity and chat membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceState {
    /// Whether this participant is mid-burst. Only debouncer edges set it.
    pub local_typing: bool,
    /// Peers whose last typing signal was "started".
    pub typing_peers: BTreeSet<ParticipantId>,
    pub active_participants: BTreeSet<ParticipantId>,
}

impl PresenceState {
    /// Whether any peer is typing.
    pub fn remote_typing(&self) -> bool {
        !self.typing_peers.is_empty()
    }

    pub fn is_active(&self, id: &ParticipantId) -> bool {
        self.active_participants.contains(id)
    }
}

/// One presence-relevant event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceChange {
    LocalTyping(bool),
    RemoteTyping {
        participant: ParticipantId,
        typing: bool,
    },
    Joined(ParticipantId),
    Left(ParticipantId),
    /// Authoritative roster re-read from the store.
    Roster(BTreeSet<ParticipantId>),
}

/// Apply `change` to `state` as seen by participant `me`.
///
/// Membership changes are idempotent set operations, so a duplicate join or
/// a stale leave for a non-member leaves the roster as it was.
pub fn transition(
    mut state: PresenceState,
    change: PresenceChange,
    me: &ParticipantId,
) -> PresenceState {
    match change {
        PresenceChange::LocalTyping(typing) => {
            state.local_typing = typing;
        }
        PresenceChange::RemoteTyping {
            participant,
            typing,
        } => {
            if &participant == me {
                return state;
            }
            if typing {
                state.typing_peers.insert(participant);
            } else {
                state.typing_peers.remove(&participant);
            }
        }
        PresenceChange::Joined(id) => {
            state.active_participants.insert(id);
        }
        PresenceChange::Left(id) => {
            state.typing_peers.remove(&id);
            state.active_participants.remove(&id);
        }
        PresenceChange::Roster(roster) => {
            state.active_participants = roster;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me() -> ParticipantId {
        ParticipantId::from("me")
    }

    #[test]
    fn self_typing_echo_is_ignored() {
        let state = transition(
            PresenceState::default(),
            PresenceChange::RemoteTyping {
                participant: me(),
                typing: true,
            },
            &me(),
        );
        assert!(!state.remote_typing());
        assert!(!state.local_typing);
    }

    #[test]
    fn peer_typing_toggles_remote_flag() {
        let peer = ParticipantId::from("peer");
        let state = transition(
            PresenceState::default(),
            PresenceChange::RemoteTyping {
                participant: peer.clone(),
                typing: true,
            },
            &me(),
        );
        assert!(state.remote_typing());

        let state = transition(
            state,
            PresenceChange::RemoteTyping {
                participant: peer,
                typing: false,
            },
            &me(),
        );
        assert!(!state.remote_typing());
    }

    #[test]
    fn remote_typing_stays_on_while_any_peer_types() {
        let a = ParticipantId::from("a");
        let b = ParticipantId::from("b");
        let mut state = PresenceState::default();
        for p in [&a, &b] {
            state = transition(
                state,
                PresenceChange::RemoteTyping {
                    participant: p.clone(),
                    typing: true,
                },
                &me(),
            );
        }
        state = transition(
            state,
            PresenceChange::RemoteTyping {
                participant: a,
                typing: false,
            },
            &me(),
        );
        assert!(state.remote_typing());
    }

    #[test]
    fn join_is_idempotent() {
        let peer = ParticipantId::from("peer");
        let mut state = PresenceState::default();
        state = transition(state, PresenceChange::Joined(peer.clone()), &me());
        state = transition(state, PresenceChange::Joined(peer), &me());
        assert_eq!(state.active_participants.len(), 1);
    }

    #[test]
    fn leaving_non_member_is_noop() {
        let peer = ParticipantId::from("peer");
        let state = transition(
            PresenceState::default(),
            PresenceChange::Joined(peer),
            &me(),
        );
        let before = state.clone();
        let after = transition(
            state,
            PresenceChange::Left(ParticipantId::from("stranger")),
            &me(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn stale_leave_after_join_settles_consistently() {
        let peer = ParticipantId::from("peer");
        let mut state = PresenceState::default();
        state = transition(state, PresenceChange::Joined(peer.clone()), &me());
        state = transition(state, PresenceChange::Left(peer.clone()), &me());
        state = transition(state, PresenceChange::Left(peer.clone()), &me());
        assert!(!state.is_active(&peer));
        assert!(state.active_participants.is_empty());
    }

    #[test]
    fn leaving_clears_typing() {
        let peer = ParticipantId::from("peer");
        let mut state = PresenceState::default();
        state = transition(state, PresenceChange::Joined(peer.clone()), &me());
        state = transition(
            state,
            PresenceChange::RemoteTyping {
                participant: peer.clone(),
                typing: true,
            },
            &me(),
        );
        state = transition(state, PresenceChange::Left(peer), &me());
        assert!(!state.remote_typing());
    }

    #[test]
    fn roster_replaces_membership_but_keeps_typing() {
        let peer = ParticipantId::from("peer");
        let mut state = PresenceState::default();
        state = transition(state, PresenceChange::LocalTyping(true), &me());
        state = transition(state, PresenceChange::Joined(ParticipantId::from("old")), &me());
        let roster: BTreeSet<_> = [peer.clone(), me()].into_iter().collect();
        state = transition(state, PresenceChange::Roster(roster.clone()), &me());
        assert_eq!(state.active_participants, roster);
        assert!(state.local_typing);
    }
}
