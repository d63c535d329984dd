use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::memory::ChatMemory;

/// Tracks which conversations exist, grouped by business category ("chat",
/// "travel", "service", ...), and keeps that index consistent with the
/// shared [`ChatMemory`] on delete and clear.
///
/// The index maps category to an ordered, duplicate-free list of
/// conversation ids; list order reflects first use. Each operation runs as a
/// single critical section under the index mutex, so concurrent `save` calls
/// on the same category cannot lose an append.
pub struct ChatHistoryStore {
    index: Mutex<HashMap<String, Vec<String>>>,
    memory: Arc<dyn ChatMemory>,
}

impl ChatHistoryStore {
    pub fn new(memory: Arc<dyn ChatMemory>) -> Self {
        ChatHistoryStore {
            index: Mutex::new(HashMap::new()),
            memory,
        }
    }

    /// Record a conversation under a category. Idempotent: an id already
    /// listed is left where it is. Ids are caller-supplied tokens and are
    /// stored as given, blank or not.
    pub fn save(&self, category: &str, chat_id: &str) {
        let mut index = self.lock_index();
        let chat_ids = index.entry(category.to_string()).or_default();
        if chat_ids.iter().any(|id| id == chat_id) {
            return;
        }
        chat_ids.push(chat_id.to_string());
    }

    /// Conversation ids of a category in first-use order. A category that
    /// was never used yields an empty list, never an absent value.
    pub fn chat_ids(&self, category: &str) -> Vec<String> {
        self.lock_index().get(category).cloned().unwrap_or_default()
    }

    /// Remove a conversation from a category's list, then purge its messages
    /// from memory. The purge runs regardless of whether the id was listed;
    /// unknown categories and ids are silent no-ops on the index side.
    pub fn delete(&self, category: &str, chat_id: &str) {
        {
            let mut index = self.lock_index();
            if let Some(chat_ids) = index.get_mut(category) {
                chat_ids.retain(|id| id != chat_id);
            }
        }
        self.memory.remove(chat_id);
    }

    /// Purge every conversation listed under a category from memory, then
    /// empty the category's list. Unknown category is a no-op. Memory is
    /// purged first, so an interrupted clear can be resumed by calling it
    /// again.
    pub fn clear(&self, category: &str) {
        let mut index = self.lock_index();
        if let Some(chat_ids) = index.get_mut(category) {
            for chat_id in chat_ids.iter() {
                self.memory.remove(chat_id);
            }
            chat_ids.clear();
        }
    }

    pub(super) fn lock_index(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.index
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn memory(&self) -> &Arc<dyn ChatMemory> {
        &self.memory
    }
}
