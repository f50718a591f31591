mod cli;
mod input;
mod render;
mod setup;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use huddle_chat::{ChatSession, ChatView, JsonFileStore, RoomRuntime, SessionCommand};
use huddle_common::ConfigError;
use huddle_config::HuddleConfig;

use crate::input::{parse_line, InputAction, HELP};

fn load_config(args: &cli::Args) -> Result<HuddleConfig, ConfigError> {
    match &args.config {
        Some(path) => huddle_config::load_config_from(path),
        None => huddle_config::load_config(),
    }
}

/// Print view changes until the session drops its sender.
async fn render_loop(mut view_rx: watch::Receiver<ChatView>) {
    let mut prev = view_rx.borrow_and_update().clone();
    while view_rx.changed().await.is_ok() {
        let next = view_rx.borrow_and_update().clone();
        for line in render::diff(&prev, &next) {
            println!("{line}");
        }
        prev = next;
    }
}

/// Forward stdin lines to the session until quit, EOF or Ctrl-C.
async fn input_loop(commands: mpsc::Sender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {e}");
                break;
            }
        };
        match parse_line(&line) {
            InputAction::Command(command) => {
                if commands.send(command).await.is_err() {
                    return;
                }
            }
            InputAction::Help => println!("{HELP}"),
            InputAction::Quit => break,
            InputAction::Unknown(name) => println!("unknown command /{name} (try /help)"),
            InputAction::Nothing => {}
        }
    }
    let _ = commands.send(SessionCommand::Shutdown).await;
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{e}");
            1
        }
    };

    // The stdin reader thread may still be blocked on a read.
    std::process::exit(code);
}

async fn run(args: cli::Args) -> huddle_common::Result<()> {
    // Load config before logging so the file can set the level.
    let loaded = load_config(&args);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => HuddleConfig::default(),
    };

    // Initialize logging
    let directive = setup::log_directive(&args, &config);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Huddle v{} starting...", env!("CARGO_PKG_VERSION"));

    match loaded {
        Ok(_) => tracing::info!("Config loaded"),
        Err(e @ ConfigError::ValidationError(_)) => return Err(e.into()),
        Err(e) => tracing::warn!("Config load failed, using defaults: {e}"),
    }
    setup::apply_overrides(&mut config, &args);

    // Resolve identity
    let identity = setup::identity(&config);
    if !identity.authenticated {
        tracing::warn!(participant = %identity.participant_id, "No participant id configured, joining as guest");
    }

    // Open the shared store
    let path = setup::store_path(&config)?;
    tracing::info!("Store: {}", path.display());
    let store = JsonFileStore::open(&path).await?;

    // Build the session
    let runtime = RoomRuntime::new(setup::room_client_config(&config, &identity));
    let (mut session, view_rx) = ChatSession::new(
        identity.clone(),
        setup::session_settings(&config),
        Arc::new(runtime),
        Arc::new(store),
    );

    println!(
        "huddle: {} in room '{}' (/help for commands)",
        identity.display_name, config.room.name
    );
    let render_handle = tokio::spawn(render_loop(view_rx));

    if let Err(e) = session.start().await {
        tracing::warn!("Continuing without live updates: {e}");
    }

    let (command_tx, command_rx) = mpsc::channel(64);
    let session_handle = tokio::spawn(session.run(command_rx));

    input_loop(command_tx).await;

    if let Err(e) = session_handle.await {
        tracing::error!("Session task failed: {e}");
    }
    let _ = render_handle.await;
    tracing::info!("Shutdown complete");
    Ok(())
}
