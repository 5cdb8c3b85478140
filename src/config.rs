use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mapper::dates::Timezone;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub timezone: Timezone,
    pub pretty: bool,
    /// Tracing filter used when RUST_LOG is not set.
    pub log: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timezone: Timezone::Utc,
            pretty: true,
            log: "warn".into(),
        }
    }
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trello2kanban")
        .join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
