//! Durable message store configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of the durable message store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON store document. Defaults to the platform data
    /// directory (`<data_dir>/huddle/<room>.json`) when unset.
    pub path: Option<PathBuf>,
}
