pub mod bootstrap;
pub mod identity;
pub mod pipeline;
pub mod presence;
pub mod protocol;
pub mod room;
pub mod session;
pub mod store;
pub mod timer;
pub mod transport;
pub mod typing;

#[cfg(test)]
mod test_support;

pub use bootstrap::{BootState, SessionBootstrap, SessionHandle};
pub use identity::Identity;
pub use pipeline::{SubmissionPipeline, SubmissionResult};
pub use presence::{PresenceChange, PresenceState, PresenceTracker};
pub use protocol::{InboundEvent, OutboundIntent, RoomHello};
pub use room::{RoomClient, RoomClientConfig, RoomRuntime};
pub use session::{ChatSession, ChatView, Notice, NoticeLevel, SessionCommand, SessionSettings};
pub use store::{ChatMessage, ChatStore, JsonFileStore, MemoryStore, MessageQuery, MessageView};
pub use transport::{
    ConnectionState, LinkStatus, Transport, TransportConnection, TransportEvent, TransportRuntime,
    TransportSession,
};
pub use typing::{TypingDebouncer, TypingEdge};
