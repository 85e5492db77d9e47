//! Async OpenAI API client
//!
//! Implements the Chat Completions API. Suggestions use native structured
//! output (`response_format` with a strict JSON schema).

use reqwest::Client;
use serde::Deserialize;

use super::{AiError, malformed, post_json};
use crate::ai::suggestion::{SCHEMA_NAME, SuggestionSet, parse_envelope, suggestions_schema};

/// OpenAI API base URL
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

const PROVIDER: &str = "OpenAI";

/// Async OpenAI API client
#[derive(Debug, Clone)]
pub struct AsyncOpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl AsyncOpenAiClient {
    /// Create a new async OpenAI client
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Send requests to another OpenAI-compatible base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request body for a plain chat completion
    fn build_chat_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ]
        })
    }

    /// Request body constrained to the suggestions schema
    fn build_suggestions_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        let mut body = self.build_chat_body(system_prompt, user_prompt);
        body["response_format"] = serde_json::json!({
            "type": "json_schema",
            "json_schema": {
                "name": SCHEMA_NAME,
                "schema": suggestions_schema(),
                "strict": true
            }
        });
        body
    }

    async fn complete(&self, body: &serde_json::Value) -> Result<String, AiError> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH))
            .header("Authorization", format!("Bearer {}", self.api_key));

        let text = post_json(PROVIDER, request, body).await?;
        parse_chat_response(&text)
    }

    /// Ask for suggestions as structured output
    pub async fn get_suggestions(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<SuggestionSet, AiError> {
        let body = self.build_suggestions_body(system_prompt, user_prompt);
        let content = self.complete(&body).await?;

        parse_envelope(&content).map_err(|e| {
            malformed(
                PROVIDER,
                format!("failed to unmarshal suggestions: {}", e),
            )
        })
    }

    /// Ask for free-form text
    pub async fn create_artifact(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AiError> {
        let body = self.build_chat_body(system_prompt, user_prompt);
        self.complete(&body).await
    }
}

/// Extract the first choice's message content
fn parse_chat_response(text: &str) -> Result<String, AiError> {
    let response: ChatResponse = serde_json::from_str(text)
        .map_err(|e| malformed(PROVIDER, format!("failed to unmarshal response: {}", e)))?;

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| malformed(PROVIDER, "response contained no choices"))?;

    if let Some(refusal) = message.refusal {
        return Err(malformed(PROVIDER, format!("model refused: {}", refusal)));
    }

    message
        .content
        .ok_or_else(|| malformed(PROVIDER, "response message has no content"))
}

#[cfg(test)]
#[path = "async_openai_tests.rs"]
mod async_openai_tests;
