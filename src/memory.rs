use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::Message;

/// Message buffer shared between the model-invocation path, which appends on
/// every turn, and the chat history store, which removes and exports.
///
/// `remove` and `export_all` are part of the contract on purpose: bulk
/// removal and a full export are exactly what delete/clear and shutdown
/// persistence need, and keeping them public means no caller ever has to
/// reach into an implementation's internals.
pub trait ChatMemory: Send + Sync {
    /// Append messages to a conversation, creating it if needed.
    fn add(&self, chat_id: &str, messages: Vec<Message>);

    /// All messages of a conversation, oldest first. Empty if unknown.
    fn messages(&self, chat_id: &str) -> Vec<Message>;

    /// Drop a conversation and all its messages. No-op if unknown.
    fn remove(&self, chat_id: &str);

    /// Snapshot of every conversation, for persistence.
    fn export_all(&self) -> HashMap<String, Vec<Message>>;
}

/// Process-local `ChatMemory` backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryChatMemory {
    conversations: Mutex<HashMap<String, Vec<Message>>>,
}

impl InMemoryChatMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Message>>> {
        self.conversations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ChatMemory for InMemoryChatMemory {
    fn add(&self, chat_id: &str, messages: Vec<Message>) {
        self.lock()
            .entry(chat_id.to_string())
            .or_default()
            .extend(messages);
    }

    fn messages(&self, chat_id: &str) -> Vec<Message> {
        self.lock().get(chat_id).cloned().unwrap_or_default()
    }

    fn remove(&self, chat_id: &str) {
        self.lock().remove(chat_id);
    }

    fn export_all(&self) -> HashMap<String, Vec<Message>> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn add_appends_in_order() {
        let memory = InMemoryChatMemory::new();
        memory.add("c1", vec![Message::user("hi")]);
        memory.add("c1", vec![Message::assistant("hello")]);

        let messages = memory.messages("c1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn unknown_conversation_reads_empty() {
        let memory = InMemoryChatMemory::new();
        assert!(memory.messages("nope").is_empty());
    }

    #[test]
    fn remove_drops_only_that_conversation() {
        let memory = InMemoryChatMemory::new();
        memory.add("a", vec![Message::user("one")]);
        memory.add("b", vec![Message::user("two")]);

        memory.remove("a");
        memory.remove("never-existed");

        assert!(memory.messages("a").is_empty());
        assert_eq!(memory.messages("b").len(), 1);
    }

    #[test]
    fn export_all_snapshots_every_conversation() {
        let memory = InMemoryChatMemory::new();
        memory.add("a", vec![Message::user("one")]);
        memory.add("b", vec![Message::user("two"), Message::assistant("ok")]);

        let export = memory.export_all();
        assert_eq!(export.len(), 2);
        assert_eq!(export["a"].len(), 1);
        assert_eq!(export["b"].len(), 2);
    }
}
