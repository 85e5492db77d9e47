//! Tests for AI provider abstraction

use super::*;
use crate::config::ai_types::{AiConfig, AiProviderType, AnthropicConfig, OpenAiConfig};
use proptest::prelude::*;

fn config(provider: AiProviderType) -> AiConfig {
    AiConfig {
        provider,
        secret_path: Some("./secrets/key".into()),
        secret_env_var: Some("TEST_KEY".to_string()),
        timeout_secs: Some(30),
        openai: OpenAiConfig::default(),
        anthropic: AnthropicConfig::default(),
    }
}

// Blank API keys never produce a provider
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_blank_api_key_produces_error(
        empty_key in prop::string::string_regex("[ \t]*").unwrap(),
        provider in prop::sample::select(vec![AiProviderType::Openai, AiProviderType::Anthropic]),
    ) {
        let result = AsyncAiProvider::from_config(&config(provider), empty_key);

        match result {
            Err(AiError::NotConfigured { provider: name, message }) => {
                prop_assert_eq!(name, provider.display_name());
                prop_assert!(message.contains("Missing API key"), "{}", message);
            }
            other => prop_assert!(false, "Expected NotConfigured error, got {:?}", other),
        }
    }

    #[test]
    fn prop_valid_api_key_creates_selected_provider(
        api_key in "[a-zA-Z0-9_-]{10,50}",
        provider in prop::sample::select(vec![AiProviderType::Openai, AiProviderType::Anthropic]),
    ) {
        let created = AsyncAiProvider::from_config(&config(provider), api_key);
        prop_assert!(created.is_ok());
        prop_assert_eq!(created.unwrap().name(), provider.display_name());
    }
}

#[test]
fn test_openai_provider_uses_configured_model() {
    let mut cfg = config(AiProviderType::Openai);
    cfg.openai.model = "gpt-4.1".to_string();

    match AsyncAiProvider::from_config(&cfg, "sk-test".to_string()).unwrap() {
        AsyncAiProvider::OpenAi(client) => assert_eq!(client.model(), "gpt-4.1"),
        other => panic!("Expected OpenAi provider, got {:?}", other),
    }
}

#[test]
fn test_anthropic_provider_uses_configured_model() {
    let mut cfg = config(AiProviderType::Anthropic);
    cfg.anthropic.model = "claude-sonnet-4-5".to_string();

    match AsyncAiProvider::from_config(&cfg, "sk-ant".to_string()).unwrap() {
        AsyncAiProvider::Anthropic(client) => assert_eq!(client.model(), "claude-sonnet-4-5"),
        other => panic!("Expected Anthropic provider, got {:?}", other),
    }
}

#[test]
fn test_provider_without_timeout_builds() {
    let mut cfg = config(AiProviderType::Openai);
    cfg.timeout_secs = None;
    assert!(AsyncAiProvider::from_config(&cfg, "sk-test".to_string()).is_ok());
}

#[test]
fn test_missing_key_message_names_sources() {
    let err = AsyncAiProvider::from_config(&config(AiProviderType::Anthropic), String::new())
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"[Anthropic] AI not configured: Missing API key. Put it in ./secrets/key or set TEST_KEY."
    );
}

#[test]
fn test_error_display_carries_provider_context() {
    let api = AiError::Api {
        provider: "OpenAI".to_string(),
        code: 429,
        message: "Rate limit reached".to_string(),
    };
    assert_eq!(api.to_string(), "[OpenAI] API error (429): Rate limit reached");

    let network = AiError::Network {
        provider: "Anthropic".to_string(),
        message: "connection refused".to_string(),
    };
    assert_eq!(network.to_string(), "[Anthropic] Network error: connection refused");

    let malformed = malformed("OpenAI", "bad json");
    assert_eq!(malformed.to_string(), "[OpenAI] Malformed response: bad json");
}

#[test]
fn test_configured_base_url_is_applied() {
    let mut cfg = config(AiProviderType::Anthropic);
    cfg.anthropic.base_url = Some("http://localhost:9000/v1".to_string());

    match AsyncAiProvider::from_config(&cfg, "sk-ant".to_string()).unwrap() {
        AsyncAiProvider::Anthropic(client) => {
            assert_eq!(client.base_url(), "http://localhost:9000/v1")
        }
        other => panic!("Expected Anthropic provider, got {:?}", other),
    }
}

#[test]
fn test_zero_timeout_builds_provider_without_timeout() {
    let mut cfg = config(AiProviderType::Openai);
    cfg.timeout_secs = Some(0);
    assert_eq!(cfg.timeout(), None);
    assert!(AsyncAiProvider::from_config(&cfg, "sk-test".to_string()).is_ok());
}
