//! Server-side fan-out rules. Clients speak the frames defined in
//! `huddle_chat::protocol`; the server only translates intents into events.

use huddle_chat::protocol::{InboundEvent, OutboundIntent, RoomHello};
use huddle_common::ParticipantId;

/// What one published intent turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fanout {
    /// Sent to every other member of the room.
    pub to_others: Option<InboundEvent>,
    /// Sent back to the publisher.
    pub to_sender: Option<InboundEvent>,
}

/// Translate an intent from `sender` into the events the room delivers.
pub fn fanout(intent: OutboundIntent, sender: &ParticipantId) -> Fanout {
    match intent {
        OutboundIntent::TypingStart => Fanout {
            to_others: Some(InboundEvent::RemoteTypingStart {
                participant_id: sender.clone(),
            }),
            to_sender: None,
        },
        OutboundIntent::TypingStop => Fanout {
            to_others: Some(InboundEvent::RemoteTypingStop {
                participant_id: sender.clone(),
            }),
            to_sender: None,
        },
        OutboundIntent::Transmit => Fanout {
            to_others: Some(InboundEvent::RoomUpdated),
            to_sender: Some(ack(true, "Sent")),
        },
        OutboundIntent::ParticipantEntered | OutboundIntent::ParticipantLeft => Fanout {
            to_others: Some(InboundEvent::ParticipantsUpdated),
            to_sender: None,
        },
    }
}

pub fn ack(ok: bool, detail: &str) -> InboundEvent {
    InboundEvent::Ack {
        ok,
        detail: detail.to_string(),
    }
}

pub fn parse_hello(text: &str) -> Result<RoomHello, String> {
    let hello: RoomHello = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if hello.room.trim().is_empty() {
        return Err("room name is empty".into());
    }
    if hello.participant_id.as_str().trim().is_empty() {
        return Err("participant id is empty".into());
    }
    Ok(hello)
}

/// Encode an event as a text frame.
pub fn encode(event: &InboundEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(event = event.name(), error = %e, "Failed to encode event");
            None
        }
    }
}
