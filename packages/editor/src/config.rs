use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::component::Paragraph;
use crate::errors::ConfigError;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of transactions kept in the log (0 = unlimited)
    #[serde(default)]
    pub max_history: usize,

    /// Variant used to populate sections inserted without components
    #[serde(default = "default_variant")]
    pub default_variant: String,
}

fn default_variant() -> String {
    Paragraph::KIND.to_string()
}

impl EditorConfig {
    /// Load `folio.config.json` from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = PathBuf::from(dir.as_ref()).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicit config file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: 0,
            default_variant: default_variant(),
        }
    }
}
