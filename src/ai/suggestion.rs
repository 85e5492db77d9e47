//! Unit test suggestions returned by the AI provider
//!
//! Providers are asked for a JSON object of the shape:
//! ```text
//! {
//!   "suggestions": [
//!     { "title": "Test addition of positives", "reasons": ["basic case"] }
//!   ]
//! }
//! ```
//! The cache stores the inner array only.

use serde::{Deserialize, Serialize};

/// Name under which the schema is registered with providers that need one
pub const SCHEMA_NAME: &str = "unit_test_suggestions";

/// A single candidate unit test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short description of the test case
    pub title: String,
    /// Why the test is worth writing, in order
    pub reasons: Vec<String>,
}

/// Ordered suggestions for one piece of content
pub type SuggestionSet = Vec<Suggestion>;

/// Wire envelope the provider is constrained to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionsEnvelope {
    pub suggestions: SuggestionSet,
}

/// JSON schema for [`SuggestionsEnvelope`]
///
/// Written to satisfy OpenAI strict mode: every property is required and
/// no additional properties are allowed.
pub fn suggestions_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "reasons": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["title", "reasons"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["suggestions"],
        "additionalProperties": false
    })
}

/// Decode a provider's JSON text into suggestions
///
/// Anything that does not match the envelope is rejected; a missing
/// `suggestions` key is never read as an empty set.
pub fn parse_envelope(text: &str) -> Result<SuggestionSet, serde_json::Error> {
    serde_json::from_str::<SuggestionsEnvelope>(text.trim()).map(|e| e.suggestions)
}

/// Decode an already-parsed JSON value (e.g. a tool call input)
pub fn parse_envelope_value(value: serde_json::Value) -> Result<SuggestionSet, serde_json::Error> {
    serde_json::from_value::<SuggestionsEnvelope>(value).map(|e| e.suggestions)
}

#[cfg(test)]
#[path = "suggestion_tests.rs"]
mod suggestion_tests;
