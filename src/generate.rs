//! Unit test generation pipeline
//!
//! One invocation walks these stages:
//! ```text
//! Start -> Fingerprinted -> CacheHit | CacheMiss -> SuggestionsReady
//!       -> AwaitingSelection -> Generating -> Done
//! ```
//! On a cache miss the fresh suggestions are written to the cache in the
//! background while the user picks one; the write is joined before `run`
//! returns so its outcome is always reported.

use std::fmt;
use std::path::PathBuf;

use crate::ai::fence::extract_fenced_block;
use crate::ai::prompt::{
    SUGGESTION_SYSTEM_PROMPT, TEST_SYSTEM_PROMPT, build_suggestion_prompt, build_test_prompt,
};
use crate::ai::provider::SuggestionProvider;
use crate::ai::suggestion::{Suggestion, SuggestionSet};
use crate::cache::{CacheError, CacheLookup, PendingStore, SuggestionCache};
use crate::error::GenerateError;
use crate::fingerprint::Fingerprint;
use crate::output::{ArtifactSink, Emitted};
use crate::selection::Selector;

/// Pipeline stage, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Fingerprinted,
    CacheHit,
    CacheMiss,
    SuggestionsReady,
    AwaitingSelection,
    Generating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Fingerprinted => "fingerprinted",
            Stage::CacheHit => "cache-hit",
            Stage::CacheMiss => "cache-miss",
            Stage::SuggestionsReady => "suggestions-ready",
            Stage::AwaitingSelection => "awaiting-selection",
            Stage::Generating => "generating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Where the suggestions of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    Cache,
    Provider,
}

/// Suggestions for one piece of content
#[derive(Debug)]
pub struct Suggestions {
    pub fingerprint: Fingerprint,
    pub set: SuggestionSet,
    pub source: SuggestionSource,
    /// Background cache write started on a miss
    pub pending: Option<PendingStore>,
}

/// Outcome of the background cache write
#[derive(Debug)]
pub enum CacheWrite {
    /// Suggestions came from the cache or were empty; nothing to write
    Skipped,
    Written(PathBuf),
    Failed(CacheError),
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub fingerprint: Fingerprint,
    pub source: SuggestionSource,
    pub selected: Suggestion,
    pub artifact: String,
    pub emitted: Emitted,
    pub cache_write: CacheWrite,
}

/// Drives suggestion retrieval and test generation for one source file
pub struct Generator<P> {
    provider: P,
    cache: SuggestionCache,
    language: String,
}

impl<P: SuggestionProvider> Generator<P> {
    /// `language` is the name used in the suggestion prompt (e.g. "Go")
    pub fn new(provider: P, cache: SuggestionCache, language: impl Into<String>) -> Self {
        Self {
            provider,
            cache,
            language: language.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cached suggestions for `content`, or fresh ones from the provider
    ///
    /// Fresh, non-empty suggestions are handed to a background cache write;
    /// the caller owns the returned `pending` handle.
    pub async fn suggestions(&self, content: &[u8]) -> Result<Suggestions, GenerateError> {
        enter(Stage::Start);
        let fingerprint = Fingerprint::from_bytes(content);
        enter(Stage::Fingerprinted);
        log::debug!(
            "Input: hash={} provider={} length={}",
            fingerprint,
            self.provider.name(),
            content.len()
        );

        if let CacheLookup::Hit(set) = self.cache.lookup(&fingerprint)? {
            enter(Stage::CacheHit);
            enter(Stage::SuggestionsReady);
            return Ok(Suggestions {
                fingerprint,
                set,
                source: SuggestionSource::Cache,
                pending: None,
            });
        }

        enter(Stage::CacheMiss);
        let user_prompt =
            build_suggestion_prompt(&self.language, &String::from_utf8_lossy(content));
        let set = self
            .provider
            .get_suggestions(SUGGESTION_SYSTEM_PROMPT, &user_prompt)
            .await?;
        log::debug!("{} returned {} suggestions", self.provider.name(), set.len());

        // Empty sets are never cached
        let pending = if set.is_empty() {
            log::warn!("{} returned no suggestions; not caching", self.provider.name());
            None
        } else {
            Some(self.cache.spawn_store(fingerprint, set.clone()))
        };
        enter(Stage::SuggestionsReady);

        Ok(Suggestions {
            fingerprint,
            set,
            source: SuggestionSource::Provider,
            pending,
        })
    }

    /// Generate test code for one suggestion, with any fence unwrapped
    pub async fn generate(
        &self,
        content: &[u8],
        suggestion: &Suggestion,
    ) -> Result<String, GenerateError> {
        enter(Stage::Generating);
        let user_prompt = build_test_prompt(&String::from_utf8_lossy(content), suggestion);
        let raw = self
            .provider
            .create_artifact(TEST_SYSTEM_PROMPT, &user_prompt)
            .await?;
        Ok(extract_fenced_block(&raw))
    }

    /// Full invocation: suggestions, selection, generation, output
    pub async fn run<S, K>(
        &self,
        content: &[u8],
        selector: &mut S,
        sink: &mut K,
    ) -> Result<RunReport, GenerateError>
    where
        S: Selector,
        K: ArtifactSink,
    {
        let mut ready = self.suggestions(content).await?;
        let pending = ready.pending.take();

        let outcome = self.select_and_generate(content, &ready.set, selector, sink).await;
        let cache_write = settle(pending).await;
        let (selected, artifact, emitted) = outcome?;

        enter(Stage::Done);
        Ok(RunReport {
            fingerprint: ready.fingerprint,
            source: ready.source,
            selected,
            artifact,
            emitted,
            cache_write,
        })
    }

    async fn select_and_generate<S, K>(
        &self,
        content: &[u8],
        set: &[Suggestion],
        selector: &mut S,
        sink: &mut K,
    ) -> Result<(Suggestion, String, Emitted), GenerateError>
    where
        S: Selector,
        K: ArtifactSink,
    {
        enter(Stage::AwaitingSelection);
        let index = selector.select(set)?;
        let selected = set
            .get(index)
            .cloned()
            .ok_or_else(|| GenerateError::InvalidSelection {
                input: (index + 1).to_string(),
                count: set.len(),
            })?;
        log::debug!("Selected suggestion {}: {}", index + 1, selected.title);

        let artifact = self.generate(content, &selected).await?;
        let emitted = sink.emit(&artifact)?;
        Ok((selected, artifact, emitted))
    }
}

/// Join the background cache write, if any
async fn settle(pending: Option<PendingStore>) -> CacheWrite {
    let Some(pending) = pending else {
        return CacheWrite::Skipped;
    };

    match pending.wait().await {
        Ok(path) => CacheWrite::Written(path),
        Err(e) => {
            log::error!("Failed to write cached suggestions: {}", e);
            CacheWrite::Failed(e)
        }
    }
}

fn enter(stage: Stage) {
    log::debug!("stage: {}", stage);
}

#[cfg(test)]
#[path = "generate_tests.rs"]
mod generate_tests;
