use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transformer::TransformOptions;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "LIGAND_CONFIG";

const DEFAULT_ACCEPT: &str = "application/json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Process-wide settings used to build the default transformer and chain.
///
/// ```toml
/// [transform]
/// retain_unknown_fields = true
///
/// [http]
/// accept = "application/activity+json"
/// user_agent = "my-crawler/0.1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LigandConfig {
    #[serde(default)]
    pub transform: TransformOptions,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Request settings for the network resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `Accept` header.
    pub accept: String,
    /// Value of the `User-Agent` header, if any.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: None,
        }
    }
}

impl LigandConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Location of the config file: `$LIGAND_CONFIG`, else
/// `<config dir>/ligand/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|p| p.join("ligand").join("config.toml"))
}

/// Loads the config file, falling back to defaults when it is missing or invalid.
pub fn load_config() -> LigandConfig {
    let Some(path) = config_path() else {
        return LigandConfig::default();
    };

    LigandConfig::from_path(path).unwrap_or_default()
}
