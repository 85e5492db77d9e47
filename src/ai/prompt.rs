//! Prompt templates
//!
//! Builds the two prompt pairs sent to the provider: one asking for a list of
//! unit test suggestions, one asking for the code of a chosen suggestion.

use std::path::Path;

use super::suggestion::Suggestion;

/// System prompt for the suggestion phase
pub const SUGGESTION_SYSTEM_PROMPT: &str =
    "You are a seasoned engineer that generates unit test suggestions for the provided code.";

/// System prompt for the generation phase
pub const TEST_SYSTEM_PROMPT: &str = "You are a seasoned engineer who writes amazing unit tests.

First write your unit test.

Second review your code:
- Validate that it is efficient and effective.
- Validate your imports -- they must be real.
- Validate your functions -- they must be real.
- Validate your code -- it must be correct.

Third, you take time to optimize your test.

Finally return your unit test. Do not explain.";

/// Human-readable language name for a source file, from its extension
pub fn language_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("go") => "Go",
        Some("rs") => "Rust",
        Some("py") => "Python",
        Some("js") | Some("mjs") | Some("cjs") | Some("jsx") => "JavaScript",
        Some("ts") | Some("tsx") => "TypeScript",
        Some("java") => "Java",
        Some("rb") => "Ruby",
        Some("c") | Some("h") => "C",
        Some("cpp") | Some("cc") | Some("cxx") | Some("hpp") => "C++",
        _ => "source",
    }
}

/// User prompt asking for suggestions, embedding the full content
pub fn build_suggestion_prompt(language: &str, content: &str) -> String {
    format!(
        "Analyze the following {} code and list possible unit tests that could be generated:\n\n{}",
        language, content
    )
}

/// User prompt asking for the test code of one suggestion
pub fn build_test_prompt(content: &str, suggestion: &Suggestion) -> String {
    let mut prompt = format!(
        "Write a unit test for the following code:\n### CODE\n{}\n\n### UNIT TEST\n: {}",
        content, suggestion.title
    );
    for reason in &suggestion.reasons {
        prompt.push_str(&format!("\n- {}", reason));
    }
    prompt
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
