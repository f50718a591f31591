pub mod errors;
pub mod id;

pub use errors::{ChatError, ConfigError, ErrorKind, HuddleError, StoreError, TransportError};
pub use id::{new_correlation_id, new_id, ParticipantId, RecordId};

pub type Result<T> = std::result::Result<T, HuddleError>;
