//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Huddle Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[room]
endpoint = "ws://127.0.0.1:8787"
name = "lobby"
# heartbeat_interval = 25     # seconds, 1-300
# reconnect_delay = 1         # seconds, 1-60
# max_reconnect_delay = 30    # seconds
# connect_timeout = 15        # seconds, 1-120

[session]
# typing_quiet_ms = 1000      # 100-10000
# notice_window_ms = 1000     # 100-60000
# history_limit = 100         # 1-10000
# max_message_length = 2000
# auto_enter = false

[store]
# path = "/path/to/lobby.json"   # defaults to <data dir>/huddle/<room>.json

[identity]
# participant_id = "alice"    # guest-<millis> when unset
# display_name = "Alice"

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
    .to_string()
}
