//! WebSocket client for a huddle room server.
//!
//! Runs the socket in background tokio tasks: sends the hello on every
//! (re)connect, keeps the link alive with pings, forwards published intents
//! and reconnects with exponential backoff until closed.

mod client;
mod connection;
mod handler;
mod runtime;
mod types;

pub use client::RoomClient;
pub use runtime::RoomRuntime;
pub use types::RoomClientConfig;
