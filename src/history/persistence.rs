use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use colored::*;

use super::store::ChatHistoryStore;
use crate::config::StorageConfig;
use crate::error::{Result, WayfarerError};
use crate::memory::ChatMemory;
use crate::models::MessageRecord;

impl ChatHistoryStore {
    /// Build a store and rehydrate it from disk.
    ///
    /// A missing history file means a first run: the store starts empty and
    /// the memory file is not consulted. A history file without a memory
    /// file loads the index and warns — those conversations will answer as
    /// if freshly started. Either file failing to parse is fatal.
    pub fn open(memory: Arc<dyn ChatMemory>, storage: &StorageConfig) -> Result<Self> {
        let store = ChatHistoryStore::new(memory);

        if !storage.history_file.exists() {
            return Ok(store);
        }

        if let Some(index) = read_json::<HashMap<String, Vec<String>>>(&storage.history_file)? {
            *store.lock_index() = index;
        }

        if !storage.memory_file.exists() {
            eprintln!(
                "{}",
                format!(
                    "Warning: {} exists but {} does not; conversation history was loaded without messages",
                    storage.history_file.display(),
                    storage.memory_file.display()
                )
                .yellow()
            );
            return Ok(store);
        }

        if let Some(conversations) =
            read_json::<HashMap<String, Vec<MessageRecord>>>(&storage.memory_file)?
        {
            for (chat_id, records) in conversations {
                let messages = records
                    .into_iter()
                    .map(MessageRecord::into_message)
                    .collect();
                store.memory().add(&chat_id, messages);
            }
        }

        Ok(store)
    }

    /// Write the session index and a full export of conversation memory to
    /// their two files, pretty-printed. Runs once at process end; a failed
    /// write is fatal, there is no later chance to retry.
    pub fn persist(&self, storage: &StorageConfig) -> Result<()> {
        let index = self.lock_index().clone();
        write_json(&storage.history_file, &index)?;

        let conversations: HashMap<String, Vec<MessageRecord>> = self
            .memory()
            .export_all()
            .into_iter()
            .map(|(chat_id, messages)| {
                (chat_id, messages.iter().map(MessageRecord::from).collect())
            })
            .collect();
        write_json(&storage.memory_file, &conversations)?;

        Ok(())
    }
}

/// Parse a JSON file, tolerating a literal `null` body (`Ok(None)`). Read or
/// parse failures carry the file path so startup errors say which of the two
/// resources is bad.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        WayfarerError::HistoryError(format!("failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        WayfarerError::HistoryError(format!("failed to parse {}: {}", path.display(), e))
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents).map_err(|e| {
        WayfarerError::HistoryError(format!("failed to write {}: {}", path.display(), e))
    })
}
