//! Shared test utilities for unitgen
//!
//! This module provides common test fixtures and helper functions
//! used across multiple test modules.

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::ai::provider::{AiError, SuggestionProvider};
    use crate::ai::suggestion::{Suggestion, SuggestionSet};

    /// Source used by the end-to-end scenarios
    pub const ADD_SOURCE: &str = "func Add(a, b int) int { return a + b }";

    /// Single-suggestion set matching `ADD_SOURCE`
    pub fn add_suggestions() -> SuggestionSet {
        vec![Suggestion {
            title: "Test addition of positives".to_string(),
            reasons: vec!["basic case".to_string()],
        }]
    }

    /// Scripted provider that records what it was asked
    pub struct MockProvider {
        suggestions: Result<SuggestionSet, String>,
        artifact: Result<String, String>,
        pub suggestion_calls: AtomicUsize,
        pub artifact_calls: AtomicUsize,
        pub prompts: Mutex<Vec<(String, String)>>,
    }

    impl MockProvider {
        pub fn new(suggestions: SuggestionSet, artifact: &str) -> Self {
            Self {
                suggestions: Ok(suggestions),
                artifact: Ok(artifact.to_string()),
                suggestion_calls: AtomicUsize::new(0),
                artifact_calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Every `get_suggestions` call fails with a malformed response
        pub fn failing_suggestions(message: &str) -> Self {
            Self {
                suggestions: Err(message.to_string()),
                ..Self::new(Vec::new(), "")
            }
        }

        /// Every `create_artifact` call fails with an API error
        pub fn failing_artifact(suggestions: SuggestionSet, message: &str) -> Self {
            Self {
                artifact: Err(message.to_string()),
                ..Self::new(suggestions, "")
            }
        }

        pub fn suggestion_calls(&self) -> usize {
            self.suggestion_calls.load(Ordering::SeqCst)
        }

        pub fn artifact_calls(&self) -> usize {
            self.artifact_calls.load(Ordering::SeqCst)
        }

        /// (system, user) prompt pairs in call order
        pub fn prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
        }

        fn record(&self, system_prompt: &str, user_prompt: &str) {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push((system_prompt.to_string(), user_prompt.to_string()));
            }
        }
    }

    impl SuggestionProvider for MockProvider {
        fn name(&self) -> &'static str {
            "Mock"
        }

        async fn get_suggestions(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> Result<SuggestionSet, AiError> {
            self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
            self.record(system_prompt, user_prompt);
            self.suggestions
                .clone()
                .map_err(|message| AiError::MalformedResponse {
                    provider: "Mock".to_string(),
                    message,
                })
        }

        async fn create_artifact(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> Result<String, AiError> {
            self.artifact_calls.fetch_add(1, Ordering::SeqCst);
            self.record(system_prompt, user_prompt);
            self.artifact.clone().map_err(|message| AiError::Api {
                provider: "Mock".to_string(),
                code: 500,
                message,
            })
        }
    }
}
