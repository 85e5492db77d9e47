//! Async Anthropic Claude API client
//!
//! Implements the Messages API. Suggestions are constrained by forcing a
//! single tool call whose `input_schema` is the suggestions schema.

use reqwest::Client;
use serde::Deserialize;

use super::{AiError, malformed, post_json};
use crate::ai::suggestion::{
    SCHEMA_NAME, SuggestionSet, parse_envelope_value, suggestions_schema,
};

/// Anthropic API base URL
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

const MESSAGES_PATH: &str = "/messages";

/// Anthropic API version header
const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER: &str = "Anthropic";

/// Async Anthropic Claude API client
#[derive(Debug, Clone)]
pub struct AsyncAnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

impl AsyncAnthropicClient {
    /// Create a new async Anthropic client
    pub fn new(client: Client, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            api_key,
            model,
            max_tokens,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    /// Send requests to another base URL (e.g. a gateway in front of the API)
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

    fn build_message_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system_prompt,
            "messages": [
                { "role": "user", "content": user_prompt }
            ]
        })
    }

    fn build_suggestions_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        let mut body = self.build_message_body(system_prompt, user_prompt);
        body["tools"] = serde_json::json!([
            {
                "name": SCHEMA_NAME,
                "description": "Record the list of unit tests that could be written for the code.",
                "input_schema": suggestions_schema()
            }
        ]);
        body["tool_choice"] = serde_json::json!({ "type": "tool", "name": SCHEMA_NAME });
        body
    }

    async fn send(&self, body: &serde_json::Value) -> Result<MessagesResponse, AiError> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, MESSAGES_PATH))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let text = post_json(PROVIDER, request, body).await?;
        parse_messages_response(&text)
    }

    /// Ask for suggestions through a forced tool call
    pub async fn get_suggestions(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<SuggestionSet, AiError> {
        let body = self.build_suggestions_body(system_prompt, user_prompt);
        let response = self.send(&body).await?;
        let input = tool_input(response)?;

        parse_envelope_value(input).map_err(|e| {
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
        let body = self.build_message_body(system_prompt, user_prompt);
        let response = self.send(&body).await?;
        response_text(response)
    }
}

fn parse_messages_response(text: &str) -> Result<MessagesResponse, AiError> {
    serde_json::from_str(text)
        .map_err(|e| malformed(PROVIDER, format!("failed to unmarshal response: {}", e)))
}

/// Input of the suggestions tool call
fn tool_input(response: MessagesResponse) -> Result<serde_json::Value, AiError> {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::ToolUse { name, input } if name == SCHEMA_NAME => Some(input),
            _ => None,
        })
        .ok_or_else(|| malformed(PROVIDER, format!("response has no {} tool call", SCHEMA_NAME)))
}

/// All text blocks, concatenated in order
fn response_text(response: MessagesResponse) -> Result<String, AiError> {
    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        })
        .collect();

    if texts.is_empty() {
        return Err(malformed(PROVIDER, "response has no text content"));
    }
    Ok(texts.concat())
}

#[cfg(test)]
#[path = "async_anthropic_tests.rs"]
mod async_anthropic_tests;
