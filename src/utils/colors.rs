/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Grey for empty text, plain otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() {
        format!("{GREY}-{RESET}")
    } else {
        value.to_string()
    }
}

/// Marks the row of the task currently being timed.
pub fn colorize_running(value: &str, running: bool) -> String {
    if running {
        format!("{GREEN}{value}{RESET}")
    } else {
        value.to_string()
    }
}
