mod message;
mod record;
mod tool;

pub use message::{Message, Role};
pub use record::MessageRecord;
pub use tool::{FunctionCall, ToolCall};
