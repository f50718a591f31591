//! Background WebSocket connection loop with auto-reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use huddle_common::TransportError;

use super::handler::handle_frame;
use super::types::{RoomClientConfig, RoomCommand};
use crate::protocol::OutboundIntent;
use crate::transport::{LinkStatus, TransportEvent};

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
///
/// Exits once the client asks to disconnect or the session stops listening.
pub(crate) async fn connection_loop(
    config: RoomClientConfig,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<TransportEvent>,
    command_rx: mpsc::Receiver<RoomCommand>,
) {
    let command_rx = Arc::new(Mutex::new(command_rx));
    let closing = Arc::new(AtomicBool::new(false));
    let mut reconnect_delay = config.reconnect_delay_secs.max(1);
    let connect_timeout = config.connect_timeout_secs.max(1);

    loop {
        info!(url = %config.display_endpoint(), room = %config.room, "Connecting to room");

        match tokio::time::timeout(
            Duration::from_secs(connect_timeout),
            tokio_tungstenite::connect_async(config.endpoint.as_str()),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs.max(1);

                let (ws_write, ws_read) = ws_stream.split();
                let ws_write = Arc::new(Mutex::new(ws_write));

                // Hello first, before anything else goes out on this socket.
                match serde_json::to_string(&config.hello()) {
                    Ok(json) => {
                        let mut writer = ws_write.lock().await;
                        if let Err(e) = writer.send(WsMessage::Text(json.into())).await {
                            warn!(error = %e, "Failed to send hello");
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to encode hello"),
                }

                *connected.write().await = true;
                if event_tx
                    .send(TransportEvent::Link(LinkStatus::Connected))
                    .await
                    .is_err()
                {
                    return;
                }

                let heartbeat_handle = tokio::spawn(heartbeat_task(
                    Arc::clone(&ws_write),
                    config.heartbeat_interval_secs.max(1),
                ));

                let cmd_handle = tokio::spawn(command_forwarder(
                    Arc::clone(&command_rx),
                    Arc::clone(&ws_write),
                    Arc::clone(&closing),
                ));

                // Process incoming frames.
                let mut listening = true;
                let mut read_stream = ws_read;
                while let Some(msg_result) = read_stream.next().await {
                    match msg_result {
                        Ok(WsMessage::Text(text)) => {
                            if !handle_frame(text.as_str(), &event_tx).await {
                                listening = false;
                                break;
                            }
                        }
                        Ok(WsMessage::Close(_)) => {
                            info!("Room server closed connection");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        _ => {}
                    }
                }

                // Cleanup.
                heartbeat_handle.abort();
                cmd_handle.abort();
                *connected.write().await = false;
                if !listening {
                    debug!("Session stopped listening; closing room connection");
                    return;
                }
                let _ = event_tx
                    .send(TransportEvent::Link(LinkStatus::Disconnected))
                    .await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to room");
                let _ = event_tx
                    .send(TransportEvent::Link(LinkStatus::Error(format!(
                        "Connection failed: {e}"
                    ))))
                    .await;
            }
            Err(_elapsed) => {
                error!(timeout = connect_timeout, "WebSocket connection timed out");
                let _ = event_tx
                    .send(TransportEvent::Link(LinkStatus::Error(format!(
                        "Connection timed out after {connect_timeout}s"
                    ))))
                    .await;
            }
        }

        if closing.load(Ordering::SeqCst) || event_tx.is_closed() {
            info!("Room connection closed");
            return;
        }

        // Exponential backoff reconnect.
        info!(
            delay = reconnect_delay,
            "Reconnecting in {} seconds", reconnect_delay
        );
        if !backoff(&command_rx, Duration::from_secs(reconnect_delay)).await {
            info!("Disconnect requested while offline");
            return;
        }
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs.max(1));
    }
}

/// Wait out the reconnect delay while draining commands. Returns `false`
/// if a disconnect arrived (or the client is gone) during the wait.
async fn backoff(command_rx: &Arc<Mutex<mpsc::Receiver<RoomCommand>>>, delay: Duration) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    let mut rx = command_rx.lock().await;
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            cmd = rx.recv() => match cmd {
                Some(RoomCommand::Publish(intent)) => {
                    debug!(intent = intent.name(), "Dropping intent while offline");
                }
                Some(RoomCommand::Disconnect) | None => return false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

async fn heartbeat_task<S>(ws_write: Arc<Mutex<S>>, interval_secs: u64)
where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let mut writer = ws_write.lock().await;
        if writer.send(WsMessage::Ping(Default::default())).await.is_err() {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Command Forwarder
// ---------------------------------------------------------------------------

pub(crate) fn encode_intent(intent: OutboundIntent) -> Result<String, TransportError> {
    serde_json::to_string(&intent).map_err(|e| TransportError::Encode(e.to_string()))
}

async fn command_forwarder<S>(
    cmd_rx: Arc<Mutex<mpsc::Receiver<RoomCommand>>>,
    cmd_write: Arc<Mutex<S>>,
    closing: Arc<AtomicBool>,
) where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    let mut rx = cmd_rx.lock().await;
    while let Some(cmd) = rx.recv().await {
        match cmd {
            RoomCommand::Publish(intent) => match encode_intent(intent) {
                Ok(json) => {
                    let mut writer = cmd_write.lock().await;
                    if writer.send(WsMessage::Text(json.into())).await.is_err() {
                        warn!(intent = intent.name(), "Failed to send intent");
                    }
                }
                Err(e) => error!(intent = intent.name(), error = %e, "Dropping intent"),
            },
            RoomCommand::Disconnect => {
                closing.store(true, Ordering::SeqCst);
                let mut writer = cmd_write.lock().await;
                let _ = writer.send(WsMessage::Close(None)).await;
                return; // Exit the command forwarder
            }
        }
    }
    // Client dropped: treat as a disconnect.
    closing.store(true, Ordering::SeqCst);
    let mut writer = cmd_write.lock().await;
    let _ = writer.send(WsMessage::Close(None)).await;
}
