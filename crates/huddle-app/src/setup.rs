//! Turns the loaded config plus CLI overrides into session parts.

use std::path::PathBuf;
use std::time::Duration;

use huddle_chat::{Identity, RoomClientConfig, SessionSettings};
use huddle_common::ConfigError;
use huddle_config::toml_loader::default_data_dir;
use huddle_config::HuddleConfig;

use crate::cli::Args;

/// Apply CLI flags on top of file values.
pub fn apply_overrides(config: &mut HuddleConfig, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        config.room.endpoint = endpoint.clone();
    }
    if let Some(room) = &args.room {
        config.room.name = room.clone();
    }
    if let Some(participant) = &args.participant {
        config.identity.participant_id = Some(participant.clone());
    }
    if let Some(name) = &args.name {
        config.identity.display_name = Some(name.clone());
    }
    if let Some(store) = &args.store {
        config.store.path = Some(store.clone());
    }
    if args.enter {
        config.session.auto_enter = true;
    }
}

/// Log filter directive: CLI flag first, then the config file.
pub fn log_directive(args: &Args, config: &HuddleConfig) -> String {
    match &args.log_level {
        Some(level) => format!("huddle={level}"),
        None => format!("huddle={}", config.logging.level.as_directive()),
    }
}

pub fn identity(config: &HuddleConfig) -> Identity {
    Identity::resolve(
        config.identity.participant_id.clone(),
        config.identity.display_name.clone(),
    )
}

pub fn session_settings(config: &HuddleConfig) -> SessionSettings {
    let session = &config.session;
    SessionSettings {
        typing_quiet: Duration::from_millis(u64::from(session.typing_quiet_ms)),
        notice_window: Duration::from_millis(u64::from(session.notice_window_ms)),
        history_limit: session.history_limit as usize,
        max_message_length: session.max_message_length as usize,
        auto_enter: session.auto_enter,
    }
}

pub fn room_client_config(config: &HuddleConfig, identity: &Identity) -> RoomClientConfig {
    let room = &config.room;
    RoomClientConfig {
        endpoint: room.endpoint.clone(),
        room: room.name.clone(),
        participant_id: identity.participant_id.clone(),
        heartbeat_interval_secs: u64::from(room.heartbeat_interval),
        reconnect_delay_secs: u64::from(room.reconnect_delay),
        max_reconnect_delay_secs: u64::from(room.max_reconnect_delay),
        connect_timeout_secs: u64::from(room.connect_timeout),
    }
}

/// Store document path: configured, or `<data dir>/huddle/<room>.json`.
pub fn store_path(config: &HuddleConfig) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &config.store.path {
        return Ok(path.clone());
    }
    let file = format!("{}.json", sanitize_room(&config.room.name));
    Ok(default_data_dir()?.join(file))
}

fn sanitize_room(room: &str) -> String {
    room.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
