mod amap;
mod registry;

pub use amap::AmapClient;
pub use registry::{call_tool, format_tools_for_model, Tool, ToolRegistry};
