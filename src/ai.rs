//! AI integration for unitgen
//!
//! Prompts, the provider abstraction with its OpenAI and Anthropic backends,
//! the suggestion data model, and the fenced block utility shared by all
//! backends' generated output.

pub mod fence;
pub mod prompt;
pub mod provider;
pub mod suggestion;

pub use provider::{AiError, AsyncAiProvider, SuggestionProvider};
pub use suggestion::{Suggestion, SuggestionSet};
