//! AI provider abstraction
//!
//! Defines the SuggestionProvider capability trait, the AiError type, and the
//! AsyncAiProvider enum with a factory for creating the configured backend.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::suggestion::SuggestionSet;
use crate::config::ai_types::{AiConfig, AiProviderType};

mod async_anthropic;
mod async_openai;

pub use async_anthropic::AsyncAnthropicClient;
pub use async_openai::AsyncOpenAiClient;

/// Errors that can occur during AI operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    /// Provider cannot be constructed (missing API key, bad client settings)
    #[error("[{provider}] AI not configured: {message}")]
    NotConfigured { provider: String, message: String },

    /// Network error during API request (includes timeouts)
    #[error("[{provider}] Network error: {message}")]
    Network { provider: String, message: String },

    /// API returned an error response
    #[error("[{provider}] API error ({code}): {message}")]
    Api {
        provider: String,
        code: u16,
        message: String,
    },

    /// Response arrived but does not have the expected shape
    #[error("[{provider}] Malformed response: {message}")]
    MalformedResponse { provider: String, message: String },
}

/// Capabilities every LLM backend provides
///
/// `get_suggestions` must constrain the model to the suggestions schema and
/// reject anything that does not decode. `create_artifact` returns the model's
/// text as-is; fence unwrapping happens in the generation pipeline.
pub trait SuggestionProvider {
    /// Display name of the backend
    fn name(&self) -> &'static str;

    fn get_suggestions(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<SuggestionSet, AiError>> + Send;

    fn create_artifact(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, AiError>> + Send;
}

/// Async AI provider implementations
#[derive(Debug, Clone)]
pub enum AsyncAiProvider {
    /// OpenAI Chat Completions API
    OpenAi(AsyncOpenAiClient),
    /// Anthropic Messages API
    Anthropic(AsyncAnthropicClient),
}

impl AsyncAiProvider {
    /// Create an async AI provider from configuration
    ///
    /// `api_key` is opaque here; it was resolved by the caller.
    pub fn from_config(config: &AiConfig, api_key: String) -> Result<Self, AiError> {
        let provider_name = config.provider.display_name();

        if api_key.trim().is_empty() {
            return Err(AiError::NotConfigured {
                provider: provider_name.to_string(),
                message: format!(
                    "Missing API key. Put it in {} or set {}.",
                    config.secret_path().display(),
                    config.secret_env_var()
                ),
            });
        }

        let client = build_http_client(provider_name, config.timeout())?;

        let provider = match config.provider {
            AiProviderType::Openai => {
                let mut openai =
                    AsyncOpenAiClient::new(client, api_key, config.openai.model.clone());
                if let Some(base_url) = &config.openai.base_url {
                    openai = openai.with_base_url(base_url);
                }
                AsyncAiProvider::OpenAi(openai)
            }
            AiProviderType::Anthropic => {
                let mut anthropic = AsyncAnthropicClient::new(
                    client,
                    api_key,
                    config.anthropic.model.clone(),
                    config.anthropic.max_tokens,
                );
                if let Some(base_url) = &config.anthropic.base_url {
                    anthropic = anthropic.with_base_url(base_url);
                }
                AsyncAiProvider::Anthropic(anthropic)
            }
        };

        log::debug!("Created {} provider", provider.name());
        Ok(provider)
    }
}

impl SuggestionProvider for AsyncAiProvider {
    fn name(&self) -> &'static str {
        match self {
            AsyncAiProvider::OpenAi(_) => "OpenAI",
            AsyncAiProvider::Anthropic(_) => "Anthropic",
        }
    }

    async fn get_suggestions(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<SuggestionSet, AiError> {
        match self {
            AsyncAiProvider::OpenAi(client) => {
                client.get_suggestions(system_prompt, user_prompt).await
            }
            AsyncAiProvider::Anthropic(client) => {
                client.get_suggestions(system_prompt, user_prompt).await
            }
        }
    }

    async fn create_artifact(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AiError> {
        match self {
            AsyncAiProvider::OpenAi(client) => {
                client.create_artifact(system_prompt, user_prompt).await
            }
            AsyncAiProvider::Anthropic(client) => {
                client.create_artifact(system_prompt, user_prompt).await
            }
        }
    }
}

/// Shared HTTP client with the optional per-request timeout
fn build_http_client(provider: &str, timeout: Option<Duration>) -> Result<Client, AiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| AiError::NotConfigured {
        provider: provider.to_string(),
        message: format!("Failed to build HTTP client: {}", e),
    })
}

/// Map a reqwest send/read failure
fn network_error(provider: &str, e: reqwest::Error) -> AiError {
    let message = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else {
        e.to_string()
    };
    AiError::Network {
        provider: provider.to_string(),
        message,
    }
}

/// Send a JSON body and return the raw response text
///
/// Non-2xx responses become `AiError::Api` with the body as message.
async fn post_json(
    provider: &str,
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
) -> Result<String, AiError> {
    let response = request
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .map_err(|e| network_error(provider, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| network_error(provider, e))?;

    if !status.is_success() {
        let message = if text.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            text
        };
        return Err(AiError::Api {
            provider: provider.to_string(),
            code: status.as_u16(),
            message,
        });
    }

    Ok(text)
}

fn malformed(provider: &str, message: impl Into<String>) -> AiError {
    AiError::MalformedResponse {
        provider: provider.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
