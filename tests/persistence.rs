use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use wayfarer::config::StorageConfig;
use wayfarer::history::ChatHistoryStore;
use wayfarer::memory::{ChatMemory, InMemoryChatMemory};
use wayfarer::models::{FunctionCall, Message, Role, ToolCall};

fn storage_in(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        history_file: dir.path().join("chat-history.json"),
        memory_file: dir.path().join("chat-memory.json"),
    }
}

#[test]
fn first_run_without_files_starts_empty() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();

    assert!(store.chat_ids("chat").is_empty());
    assert!(memory.export_all().is_empty());
}

#[test]
fn round_trips_index_and_memory() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();
    store.save("chat", "a");
    store.save("chat", "b");
    store.save("travel", "t1");
    memory.add(
        "a",
        vec![Message::user("hi"), Message::assistant("hello, how can I help?")],
    );
    memory.add("t1", vec![Message::user("weather in Beijing?")]);
    store.persist(&storage).unwrap();

    let fresh_memory = Arc::new(InMemoryChatMemory::new());
    let reloaded = ChatHistoryStore::open(fresh_memory.clone(), &storage).unwrap();

    assert_eq!(reloaded.chat_ids("chat"), vec!["a", "b"]);
    assert_eq!(reloaded.chat_ids("travel"), vec!["t1"]);

    let restored = fresh_memory.messages("a");
    assert_eq!(restored.len(), 2);
    assert_eq!(restored[0].role, Role::User);
    assert_eq!(restored[0].text_content(), "hi");
    assert_eq!(restored[1].role, Role::Assistant);
    assert_eq!(restored[1].text_content(), "hello, how can I help?");
}

#[test]
fn tool_call_metadata_is_dropped_across_a_round_trip() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();
    store.save("travel", "t1");
    memory.add(
        "t1",
        vec![Message {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                tool_type: "function".to_string(),
                function: FunctionCall {
                    name: "maps_weather".to_string(),
                    arguments: "{\"city\":\"Beijing\"}".to_string(),
                },
            }]),
            tool_call_id: None,
        }],
    );
    store.persist(&storage).unwrap();

    let fresh_memory = Arc::new(InMemoryChatMemory::new());
    ChatHistoryStore::open(fresh_memory.clone(), &storage).unwrap();

    let restored = fresh_memory.messages("t1");
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].role, Role::Assistant);
    assert_eq!(restored[0].text_content(), "");
    assert!(restored[0].tool_calls.is_none());
}

#[test]
fn loads_the_documented_on_disk_layout() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    fs::write(&storage.history_file, r#"{"chat": ["a"]}"#).unwrap();
    fs::write(
        &storage.memory_file,
        r#"{"a": [{"role": "user", "content": "hi"}]}"#,
    )
    .unwrap();

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();

    assert_eq!(store.chat_ids("chat"), vec!["a"]);
    let messages = memory.messages("a");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text_content(), "hi");
}

#[test]
fn missing_memory_file_still_loads_the_index() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    fs::write(&storage.history_file, r#"{"chat": ["a", "b"]}"#).unwrap();

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();

    assert_eq!(store.chat_ids("chat"), vec!["a", "b"]);
    assert!(memory.messages("a").is_empty());
}

#[test]
fn null_file_bodies_mean_nothing_to_rehydrate() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    fs::write(&storage.history_file, "null").unwrap();
    fs::write(&storage.memory_file, "null").unwrap();

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();

    assert!(store.chat_ids("chat").is_empty());
    assert!(memory.export_all().is_empty());
}

#[test]
fn malformed_history_file_is_a_fatal_startup_error() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    fs::write(&storage.history_file, "{not json").unwrap();

    let memory = Arc::new(InMemoryChatMemory::new());
    assert!(ChatHistoryStore::open(memory, &storage).is_err());
}

#[test]
fn malformed_memory_file_is_a_fatal_startup_error() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    fs::write(&storage.history_file, r#"{"chat": ["a"]}"#).unwrap();
    fs::write(&storage.memory_file, r#"{"a": [{"role": "nonsense"}]}"#).unwrap();

    let memory = Arc::new(InMemoryChatMemory::new());
    assert!(ChatHistoryStore::open(memory, &storage).is_err());
}

#[test]
fn persisted_files_are_pretty_printed_json() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();
    store.save("chat", "a");
    memory.add("a", vec![Message::user("hi")]);
    store.persist(&storage).unwrap();

    let history = fs::read_to_string(&storage.history_file).unwrap();
    let memory_dump = fs::read_to_string(&storage.memory_file).unwrap();
    assert!(history.contains("\n  "));
    assert!(memory_dump.contains("\n  "));

    // And the dump carries records, not rich messages
    let parsed: serde_json::Value = serde_json::from_str(&memory_dump).unwrap();
    assert_eq!(parsed["a"][0]["role"], "user");
    assert_eq!(parsed["a"][0]["content"], "hi");
    assert!(parsed["a"][0].get("tool_calls").is_none());
}

#[test]
fn persist_overwrites_previous_snapshots() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let memory = Arc::new(InMemoryChatMemory::new());
    let store = ChatHistoryStore::open(memory.clone(), &storage).unwrap();
    store.save("chat", "a");
    memory.add("a", vec![Message::user("hi")]);
    store.persist(&storage).unwrap();

    store.delete("chat", "a");
    store.persist(&storage).unwrap();

    let fresh_memory = Arc::new(InMemoryChatMemory::new());
    let reloaded = ChatHistoryStore::open(fresh_memory.clone(), &storage).unwrap();
    assert!(reloaded.chat_ids("chat").is_empty());
    assert!(fresh_memory.messages("a").is_empty());
}
