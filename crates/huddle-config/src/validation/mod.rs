//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::HuddleConfig;
use huddle_common::ConfigError;

use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HuddleConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_room(&mut errors, config);
    validate_session(&mut errors, config);
    validate_identity(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_room(errors: &mut Vec<String>, config: &HuddleConfig) {
    let room = &config.room;
    if !(room.endpoint.starts_with("ws://") || room.endpoint.starts_with("wss://")) {
        errors.push(format!(
            "room.endpoint = {:?} must start with ws:// or wss://",
            room.endpoint
        ));
    }
    validate_non_empty(errors, "room.name", &room.name);
    validate_range(errors, "room.heartbeat_interval", room.heartbeat_interval, 1, 300);
    validate_range(errors, "room.reconnect_delay", room.reconnect_delay, 1, 60);
    validate_range(
        errors,
        "room.max_reconnect_delay",
        room.max_reconnect_delay,
        room.reconnect_delay,
        3600,
    );
    validate_range(errors, "room.connect_timeout", room.connect_timeout, 1, 120);
}

fn validate_session(errors: &mut Vec<String>, config: &HuddleConfig) {
    let session = &config.session;
    validate_range(errors, "session.typing_quiet_ms", session.typing_quiet_ms, 100, 10_000);
    validate_range(errors, "session.notice_window_ms", session.notice_window_ms, 100, 60_000);
    validate_range(errors, "session.history_limit", session.history_limit, 1, 10_000);
    validate_range(
        errors,
        "session.max_message_length",
        session.max_message_length,
        1,
        100_000,
    );
}

fn validate_identity(errors: &mut Vec<String>, config: &HuddleConfig) {
    if let Some(id) = &config.identity.participant_id {
        validate_non_empty(errors, "identity.participant_id", id);
        if id.chars().any(char::is_whitespace) {
            errors.push(format!(
                "identity.participant_id = {id:?} must not contain whitespace"
            ));
        }
    }
}
