// Configuration module for unitgen
// This module handles loading and parsing configuration from ~/.config/unitgen/config.toml

pub mod ai_types;
pub mod credentials;
mod types;

pub use types::{CacheConfig, Config, OutputConfig};

use std::fs;
use std::path::{Path, PathBuf};

use ai_types::AiProviderType;

use crate::error::ConfigError;

/// Result of loading configuration
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Values given on the command line; each one wins over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<String>,
    pub secret_path: Option<PathBuf>,
    pub secret_env_var: Option<String>,
    pub timeout_secs: Option<u64>,
    pub cache_dir: Option<PathBuf>,
    pub no_color: bool,
}

impl Config {
    /// Apply command line overrides
    ///
    /// Fails on a provider id outside the supported set.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(provider) = &overrides.provider {
            self.ai.provider = provider.parse::<AiProviderType>()?;
        }
        if let Some(path) = &overrides.secret_path {
            self.ai.secret_path = Some(path.clone());
        }
        if let Some(var) = &overrides.secret_env_var {
            self.ai.secret_env_var = Some(var.clone());
        }
        if let Some(secs) = overrides.timeout_secs {
            self.ai.timeout_secs = Some(secs);
        }
        if let Some(dir) = &overrides.cache_dir {
            self.cache.dir = Some(dir.clone());
        }
        if overrides.no_color {
            self.output.color = false;
        }
        Ok(())
    }
}

/// Loads configuration from ~/.config/unitgen/config.toml
///
/// Returns default configuration if the file doesn't exist or doesn't parse;
/// only an unknown provider id is an error.
pub fn load_config() -> Result<ConfigResult, ConfigError> {
    load_config_from_path(&get_config_path())
}

/// Loads configuration from an explicit path with the same fallback rules
pub fn load_config_from_path(config_path: &Path) -> Result<ConfigResult, ConfigError> {
    log::debug!("Loading config from {:?}", config_path);

    // If file doesn't exist, return defaults silently
    if !config_path.exists() {
        log::debug!("Config file does not exist, using defaults");
        return Ok(ConfigResult {
            config: Config::default(),
            warning: None,
        });
    }

    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Failed to read config file {:?}: {}", config_path, e);
            return Ok(ConfigResult {
                config: Config::default(),
                warning: Some(format!("Failed to read config: {}", e)),
            });
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => {
            log::debug!("Config parsed successfully: provider={}", config.ai.provider);
            Ok(ConfigResult {
                config,
                warning: None,
            })
        }
        Err(e) => {
            check_provider(&contents)?;
            log::error!("Failed to parse config file {:?}: {}", config_path, e);
            Ok(ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config: {}", e)),
            })
        }
    }
}

/// Fails if the file names a provider outside the supported set
fn check_provider(contents: &str) -> Result<(), ConfigError> {
    let Ok(value) = toml::from_str::<toml::Value>(contents) else {
        return Ok(());
    };
    match value.get("ai").and_then(|ai| ai.get("provider")).and_then(|p| p.as_str()) {
        Some(provider) => provider.parse::<AiProviderType>().map(|_| ()),
        None => Ok(()),
    }
}

/// Returns the path to the configuration file
///
/// Always uses ~/.config/unitgen/config.toml on all platforms for consistency.
fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("unitgen")
        .join("config.toml")
}
