//! unitgen library - LLM-assisted unit test generation
//!
//! This library exposes the core functionality of unitgen for testing purposes.

pub mod ai;
pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod generate;
pub mod output;
pub mod selection;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use cache::{CacheLookup, SuggestionCache};
pub use config::Config;
pub use fingerprint::Fingerprint;
pub use generate::{Generator, RunReport};
