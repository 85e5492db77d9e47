// API key acquisition
//
// The secret file is the recommended source; an environment variable, when
// set, overrides it.

use std::fs;
use std::path::Path;

use super::ai_types::AiConfig;
use crate::error::ConfigError;

/// Resolve the API key for the configured provider
pub fn resolve_api_key(config: &AiConfig) -> Result<String, ConfigError> {
    let env_var = config.secret_env_var();
    resolve_api_key_with(config, std::env::var(&env_var).ok())
}

/// Resolve the API key with an explicit environment value
pub fn resolve_api_key_with(
    config: &AiConfig,
    env_value: Option<String>,
) -> Result<String, ConfigError> {
    let path = config.secret_path();

    let from_file = read_secret_file(&path);
    let key = env_value
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or(from_file);

    key.ok_or_else(|| ConfigError::MissingCredential {
        provider: config.provider.display_name().to_string(),
        path,
        env_var: config.secret_env_var(),
    })
}

fn read_secret_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let key = contents.trim().to_string();
            (!key.is_empty()).then_some(key)
        }
        Err(e) => {
            log::debug!("Secret file {:?} not used: {}", path, e);
            None
        }
    }
}
