//! huddle-room: WebSocket room server for huddle chat sessions.
//!
//! Accepts WebSocket connections, groups them into rooms by their hello
//! frame, and fans published intents out to the other members. The server
//! never stores or relays message bodies; clients re-read the shared store
//! when told the room changed.

mod connection;
mod protocol;
mod rooms;

use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use huddle_chat::protocol::InboundEvent;

use crate::connection::handle_connection;
use crate::protocol::encode;
use crate::rooms::RoomRegistry;

#[derive(Parser)]
#[command(name = "huddle-room", about = "WebSocket room server for huddle chat")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8787)]
    port: u16,

    /// Seconds between `time` broadcasts (0 disables the clock).
    #[arg(long, default_value_t = 1)]
    clock_interval: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle_room=info".into()),
        )
        .init();

    let args = Args::parse();
    let registry = RoomRegistry::new();

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    tracing::info!("huddle-room listening on {}", addr);

    // Spawn the room clock.
    if args.clock_interval > 0 {
        let clock_registry = registry.clone();
        let period = Duration::from_secs(args.clock_interval);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let now = chrono::Local::now().format("%H:%M:%S").to_string();
                if let Some(json) = encode(&InboundEvent::Time(now)) {
                    clock_registry.broadcast_all(&json).await;
                }
                let rooms = clock_registry.room_count().await;
                tracing::trace!(rooms, "Clock tick");
            }
        });
    }

    // Accept loop.
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let registry = registry.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, registry).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
