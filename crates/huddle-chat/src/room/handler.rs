//! Inbound frame decoding.

use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::InboundEvent;
use crate::transport::TransportEvent;

/// Decode one text frame. Frames naming an unknown event or carrying a
/// malformed payload yield `None`.
pub(crate) fn decode_frame(text: &str) -> Option<InboundEvent> {
    match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => Some(event),
        Err(e) => {
            debug!(text = %text, error = %e, "Unrecognized frame from room");
            None
        }
    }
}

/// Decode and forward one frame. Returns `false` once the session has
/// stopped listening.
pub(crate) async fn handle_frame(text: &str, event_tx: &mpsc::Sender<TransportEvent>) -> bool {
    let Some(event) = decode_frame(text) else {
        return true;
    };
    debug!(event = event.name(), "Frame received");
    event_tx.send(TransportEvent::Inbound(event)).await.is_ok()
}
