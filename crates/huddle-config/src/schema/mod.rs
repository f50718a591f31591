//! Configuration schema types for Huddle.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod identity;
mod logging;
mod room;
mod session;
mod store;

pub use identity::*;
pub use logging::*;
pub use room::*;
pub use session::*;
pub use store::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Huddle.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct HuddleConfig {
    pub room: RoomConfig,
    pub session: SessionConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
