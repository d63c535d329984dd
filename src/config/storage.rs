use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;

/// Locations of the two durable files: the session index
/// (`chat-history.json`) and the conversation-memory export
/// (`chat-memory.json`). Paths are resolved relative to the working
/// directory unless overridden.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub history_file: PathBuf,
    pub memory_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            history_file: PathBuf::from(defaults::HISTORY_FILE),
            memory_file: PathBuf::from(defaults::MEMORY_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageFileConfig {
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    #[serde(default)]
    pub memory_file: Option<PathBuf>,
}
