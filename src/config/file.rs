//! TOML config file loading

use anyhow::{Context, Result};
use std::path::Path;

use super::types::ExtractConfig;

/// Load and validate a TOML config; omitted keys keep their defaults
///
/// # Errors
/// Unreadable file, malformed TOML, unknown enum values, or a config that
/// fails [`ExtractConfig::validate`].
pub fn load_config(path: &Path) -> Result<ExtractConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ExtractConfig = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
