use std::path::PathBuf;

use thiserror::Error;

use crate::ai::AiError;
use crate::cache::CacheError;

/// Startup failures: nothing has been sent to a provider yet
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid provider: {0} (expected one of: openai, anthropic)")]
    UnknownProvider(String),

    #[error(
        "api key is required for {provider}. Put it in {} or set {env_var}",
        path.display()
    )]
    MissingCredential {
        provider: String,
        path: PathBuf,
        env_var: String,
    },

    #[error("failed to read file {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures of a single generate invocation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provider(#[from] AiError),

    #[error("invalid selection {input:?}: expected a number from 1 to {count}")]
    InvalidSelection { input: String, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
