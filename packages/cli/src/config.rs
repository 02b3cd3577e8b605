use anyhow::Context;
use folio_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the editor config: an explicit `--config` file wins, otherwise
/// `folio.config.json` in the working directory, otherwise defaults
pub fn resolve(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<EditorConfig> {
    let config = match explicit {
        Some(path) => EditorConfig::load_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::load(cwd)
            .with_context(|| format!("Failed to load {DEFAULT_CONFIG_NAME} in {cwd}"))?,
    };

    debug!(max_history = config.max_history, default_variant = %config.default_variant, "Resolved config");
    Ok(config)
}

/// Path of the config file for a directory
pub fn config_path(cwd: &str) -> PathBuf {
    PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME)
}
