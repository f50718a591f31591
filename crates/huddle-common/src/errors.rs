use std::path::PathBuf;

use crate::id::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by a durable message store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("store data is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures reported by the live transport channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport not connected")]
    NotConnected,

    #[error("transport closed")]
    Closed,

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Coarse classification of [`ChatError`], stable for callers that only
/// need to branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    TransportLoadFailure,
    PersistenceFailure,
}

/// Errors surfaced by the chat session core.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,

    #[error("message is too long ({len} > {max} characters)")]
    MessageTooLong { len: usize, max: usize },

    #[error("failed to load transport runtime: {0}")]
    TransportLoad(String),

    #[error("failed to persist: {0}")]
    Persistence(#[from] StoreError),
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::EmptyInput | ChatError::MessageTooLong { .. } => ErrorKind::EmptyInput,
            ChatError::TransportLoad(_) => ErrorKind::TransportLoadFailure,
            ChatError::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }
}

/// Errors that end a front-end process.
#[derive(Debug, thiserror::Error)]
pub enum HuddleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
