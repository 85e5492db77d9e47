// AI configuration type definitions

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

/// Default max tokens for Anthropic responses (generated tests can be long)
fn default_max_tokens() -> u32 {
    8192
}

/// AI provider selection
///
/// Config files and `--ai-provider` share one parser, so both accept the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum AiProviderType {
    #[default]
    Openai,
    Anthropic,
}

impl AiProviderType {
    /// Identifier used in config files and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            AiProviderType::Openai => "openai",
            AiProviderType::Anthropic => "anthropic",
        }
    }

    /// Display name used in error messages and logs
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProviderType::Openai => "OpenAI",
            AiProviderType::Anthropic => "Anthropic",
        }
    }

    /// Secret file used when none is configured
    pub fn default_secret_path(&self) -> PathBuf {
        PathBuf::from(format!("./secrets/{}_api_key", self.id()))
    }

    /// Environment variable used when none is configured
    pub fn default_secret_env_var(&self) -> &'static str {
        match self {
            AiProviderType::Openai => "OPENAI_API_KEY",
            AiProviderType::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for AiProviderType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(AiProviderType::Openai),
            "anthropic" => Ok(AiProviderType::Anthropic),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl TryFrom<String> for AiProviderType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AiProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// OpenAI-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_model")]
    pub model: String,
    /// API base URL, for proxies and compatible gateways
    pub base_url: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            model: default_openai_model(),
            base_url: None,
        }
    }
}

/// Anthropic-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API base URL, for proxies and compatible gateways
    pub base_url: Option<String>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        AnthropicConfig {
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
            base_url: None,
        }
    }
}

/// AI configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AiConfig {
    /// Which AI provider to use
    #[serde(default)]
    pub provider: AiProviderType,
    /// File holding the API key
    pub secret_path: Option<PathBuf>,
    /// Environment variable holding the API key (wins over the file)
    pub secret_env_var: Option<String>,
    /// Per-request timeout; unset or `0` means no timeout
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl AiConfig {
    pub fn secret_path(&self) -> PathBuf {
        self.secret_path
            .clone()
            .unwrap_or_else(|| self.provider.default_secret_path())
    }

    pub fn secret_env_var(&self) -> String {
        self.secret_env_var
            .clone()
            .unwrap_or_else(|| self.provider.default_secret_env_var().to_string())
    }

    /// Request timeout, `None` when unset or zero
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "ai_types_tests.rs"]
mod ai_types_tests;
