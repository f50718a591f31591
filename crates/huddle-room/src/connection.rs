//! Per-connection handler: hello, register, then fan out intents.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use huddle_chat::protocol::{InboundEvent, OutboundIntent, RoomHello};

use crate::protocol::{ack, encode, fanout, parse_hello};
use crate::rooms::RoomRegistry;

type WsStream = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// Frames queued per member before it counts as stalled.
const MEMBER_QUEUE: usize = 256;

/// Handle a single WebSocket connection.
pub async fn handle_connection(ws: WsStream, addr: SocketAddr, registry: RoomRegistry) {
    let (mut sink, mut stream) = ws.split();

    // 1. Read the hello to learn the room and participant.
    let hello = match read_hello(&mut stream, addr).await {
        Some(hello) => hello,
        None => {
            if let Some(json) = encode(&ack(false, "expected hello")) {
                let _ = sink.send(Message::Text(json.into())).await;
            }
            return;
        }
    };
    let RoomHello {
        room,
        participant_id,
    } = hello;

    // 2. Create our receive channel and register.
    // The registry holds the only sender, so eviction closes `rx`.
    let (tx, mut rx) = mpsc::channel::<String>(MEMBER_QUEUE);
    let member = registry.join(&room, participant_id.clone(), tx).await;
    let members = registry.member_count(&room).await;

    tracing::info!(
        peer = %addr,
        room = %room,
        participant = %participant_id,
        members,
        "Member joined"
    );

    // 3. Forwarding loop.
    loop {
        tokio::select! {
            // Frames queued for this member → its WebSocket
            frame = rx.recv() => {
                let Some(frame) = frame else {
                    tracing::warn!(peer = %addr, room = %room, "Evicted: not reading fast enough");
                    break;
                };
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            // Intents from this member → fan out to the room
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<OutboundIntent>(&text) {
                            Ok(intent) => {
                                tracing::debug!(
                                    room = %room,
                                    participant = %participant_id,
                                    intent = intent.name(),
                                    "Intent received"
                                );
                                let out = fanout(intent, &participant_id);
                                if let Some(json) = out.to_others.as_ref().and_then(encode) {
                                    registry.broadcast_except(&room, member, &json).await;
                                }
                                if let Some(json) = out.to_sender.as_ref().and_then(encode) {
                                    registry.send_to(&room, member, &json).await;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(peer = %addr, error = %e, "Malformed frame");
                                if let Some(json) = encode(&ack(false, &format!("malformed frame: {e}"))) {
                                    registry.send_to(&room, member, &json).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 4. Cleanup.
    tracing::info!(
        peer = %addr,
        room = %room,
        participant = %participant_id,
        "Member left"
    );

    // Peers may still show this member as typing.
    let stop = InboundEvent::RemoteTypingStop {
        participant_id: participant_id.clone(),
    };
    if let Some(json) = encode(&stop) {
        registry.broadcast_except(&room, member, &json).await;
    }

    registry.leave(&room, member).await;
}

/// Read and parse the first message as a hello.
async fn read_hello(stream: &mut futures_util::stream::SplitStream<WsStream>, addr: SocketAddr) -> Option<RoomHello> {
    let frame = tokio::time::timeout(HELLO_TIMEOUT, stream.next()).await;

    match frame {
        Ok(Some(Ok(Message::Text(text)))) => match parse_hello(&text) {
            Ok(hello) => Some(hello),
            Err(e) => {
                tracing::warn!(peer = %addr, error = %e, "Invalid hello message");
                None
            }
        },
        Ok(Some(Ok(_))) => {
            tracing::warn!(peer = %addr, "Expected text hello, got another frame");
            None
        }
        Ok(Some(Err(e))) => {
            tracing::warn!(peer = %addr, error = %e, "WS error during hello");
            None
        }
        Ok(None) => {
            tracing::debug!(peer = %addr, "Connection closed before hello");
            None
        }
        Err(_) => {
            tracing::warn!(peer = %addr, "Hello timeout (10s)");
            None
        }
    }
}
