use colored::*;

/// Print an assistant reply that arrived in one piece (the streaming path
/// prints its own deltas).
pub fn display_content(content: &str) {
    println!("{}", content.trim_end());
}

pub fn display_tool_result(name: &str, result: &str) {
    println!("{}", format!("[{}]", name).cyan());
    println!("{}", result.trim_end().dimmed());
}

pub fn display_tool_error(name: &str, error: &str) {
    println!("{}", format!("[{}]", name).red());
    println!("{}", error.trim_end().dimmed());
}
