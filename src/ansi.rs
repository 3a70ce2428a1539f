//! ANSI escape codes used by the text report

pub const RESET: &str = "\x1b[0m"; // Reset all attributes

pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_BLUE: &str = "\x1b[34m";

/// Wrap `text` in `color` and a trailing reset
pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}
