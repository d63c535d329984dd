mod output;

pub use output::{display_content, display_tool_error, display_tool_result};
