// Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

use super::ai_types::AiConfig;

const CACHE_DIR: &str = "unitgen";

/// Cache configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheConfig {
    /// Directory holding one file per fingerprint
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Configured directory, else `<user cache dir>/unitgen`, else `<tmp>/unitgen`
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CACHE_DIR)
        })
    }
}

/// Output configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { color: true }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}
