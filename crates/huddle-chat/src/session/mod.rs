//! The chat session: one participant's live view of a room.
//!
//! A `ChatSession` owns the bootstrap, the transport session, the presence
//! tracker, the submission pipeline, the typing debouncer and the transient
//! notice. All of it is driven from one task by [`ChatSession::run`], and a
//! fresh [`ChatView`] is published on a `watch` channel after every handled
//! event.

mod actions;
mod core;
mod dispatch;
mod event_loop;
mod notice;
mod types;

#[cfg(test)]
mod tests;

pub use self::core::ChatSession;
pub use notice::{Notice, NoticeLevel};
pub use types::{ChatView, SessionCommand, SessionSettings};
