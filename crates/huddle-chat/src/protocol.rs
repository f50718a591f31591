//! Wire protocol for the shared chat room.
//!
//! Frames are JSON text messages of the form
//! `{"event": "<name>", "payload": {...}}`. Inbound and outbound kinds are
//! closed enums; a frame naming any other event fails to decode and is
//! dropped at the transport boundary.

use serde::{Deserialize, Serialize};

use huddle_common::ParticipantId;

// ---------------------------------------------------------------------------
// Handshake
// ---------------------------------------------------------------------------

/// First frame a client sends after the socket opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomHello {
    pub room: String,
    pub participant_id: ParticipantId,
}

// ---------------------------------------------------------------------------
// Room -> session
// ---------------------------------------------------------------------------

/// Events the room delivers to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum InboundEvent {
    /// Server clock heartbeat. Advisory only.
    Time(String),
    RemoteTypingStart {
        participant_id: ParticipantId,
    },
    RemoteTypingStop {
        participant_id: ParticipantId,
    },
    /// A message body published by a participant that did not persist it.
    MessageBroadcast {
        author_id: ParticipantId,
        content: String,
    },
    /// Status reply to the last intent this session published.
    Ack {
        ok: bool,
        #[serde(alias = "message")]
        detail: String,
    },
    /// The durable store changed; re-fetch messages.
    RoomUpdated,
    /// The participant roster changed; re-fetch active participants.
    ParticipantsUpdated,
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::Time(_) => "time",
            InboundEvent::RemoteTypingStart { .. } => "remote-typing-start",
            InboundEvent::RemoteTypingStop { .. } => "remote-typing-stop",
            InboundEvent::MessageBroadcast { .. } => "message-broadcast",
            InboundEvent::Ack { .. } => "ack",
            InboundEvent::RoomUpdated => "room-updated",
            InboundEvent::ParticipantsUpdated => "participants-updated",
        }
    }
}

// ---------------------------------------------------------------------------
// Session -> room
// ---------------------------------------------------------------------------

/// Intents a session publishes to the room.
///
/// None of them carry a message body: `Transmit` only tells peers that the
/// durable store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum OutboundIntent {
    TypingStart,
    TypingStop,
    Transmit,
    ParticipantEntered,
    ParticipantLeft,
}

impl OutboundIntent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundIntent::TypingStart => "typing-start",
            OutboundIntent::TypingStop => "typing-stop",
            OutboundIntent::Transmit => "transmit",
            OutboundIntent::ParticipantEntered => "participant-entered",
            OutboundIntent::ParticipantLeft => "participant-left",
        }
    }
}
