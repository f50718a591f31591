use std::path::PathBuf;

use clap::Parser;

/// Huddle: a terminal chat room client.
#[derive(Parser, Debug, Default)]
#[command(name = "huddle", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Participant id to chat as (defaults to a guest token).
    #[arg(short, long)]
    pub participant: Option<String>,

    /// Display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Room server URL (ws:// or wss://).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Room to join.
    #[arg(short, long)]
    pub room: Option<String>,

    /// Store document path.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Enter the chat immediately.
    #[arg(long)]
    pub enter: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
