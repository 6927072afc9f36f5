//! Configuration loading and parsing

use anyhow::{Context, Result};
use n2k_autopilot::{AutopilotConfig, SourceDirectory};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub autopilot: AutopilotConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// Signal K style source directory (JSON)
    pub sources: Option<PathBuf>,
    /// Decoded bus events, one JSON object per line
    pub events: Option<PathBuf>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load a source directory snapshot from a JSON file
pub fn load_sources(path: &Path) -> Result<SourceDirectory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources file: {:?}", path))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sources file: {:?}", path))
}
