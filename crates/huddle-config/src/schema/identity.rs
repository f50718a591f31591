//! Participant identity configuration types.

use serde::{Deserialize, Serialize};

/// Who this session speaks as.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Participant id. A timestamp-derived guest token is used when unset.
    pub participant_id: Option<String>,
    /// Display name shown next to messages. Defaults to the participant id.
    pub display_name: Option<String>,
}
