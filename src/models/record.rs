use serde::{Deserialize, Serialize};

use super::message::{Message, Role};

/// Durable form of one chat turn: role and text only. Tool-call payloads
/// carried by the rich `Message` are dropped when a conversation is written
/// to disk; role and textual content round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub role: Role,
    pub content: String,
}

impl MessageRecord {
    pub fn into_message(self) -> Message {
        Message {
            role: self.role,
            content: Some(self.content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        MessageRecord {
            role: message.role,
            content: message.text_content().to_string(),
        }
    }
}
