//! Presence: who is typing and who is in the chat.
//!
//! State is a pure projection of received events. `state` holds the value
//! type and its transition function; `tracker` binds it to the local
//! participant so self-echoes are filtered.

mod state;
mod tracker;

pub use state::{transition, PresenceChange, PresenceState};
pub use tracker::PresenceTracker;
