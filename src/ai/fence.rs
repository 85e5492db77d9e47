//! Fenced code block unwrapping
//!
//! Some providers wrap generated code in a Markdown fence:
//! ````text
//! ```go
//! func TestAdd(t *testing.T) { ... }
//! ```
//! Trailing explanation
//! ````
//! The generation pipeline unwraps this once, for every provider, so that
//! backends return raw model text.

/// Fence marker line
pub const FENCE: &str = "```";

/// Unwrap a fenced block if the text opens with one
///
/// Drops the opening fence line (with its language tag) and everything from
/// the first closing fence line onward. Text that does not start with a fence
/// is returned unchanged. An unclosed fence keeps everything after the opening line.
pub fn extract_fenced_block(text: &str) -> String {
    let trimmed = text.trim_start();
    if !trimmed.starts_with(FENCE) {
        return text.to_string();
    }

    remove_line_and_after(&remove_first_line(trimmed), FENCE)
}

/// Everything after the first newline; empty when there is no newline
pub fn remove_first_line(input: &str) -> String {
    match input.split_once('\n') {
        Some((_, rest)) => rest.to_string(),
        None => String::new(),
    }
}

/// Everything before the first line that is exactly `marker`
///
/// Returns the input unchanged if no line matches. Trailing whitespace on the
/// marker line (e.g. `\r`) is ignored.
pub fn remove_line_and_after(input: &str, marker: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();

    match lines.iter().position(|line| line.trim_end() == marker) {
        Some(i) => lines[..i].join("\n"),
        None => input.to_string(),
    }
}

#[cfg(test)]
#[path = "fence_tests.rs"]
mod fence_tests;
