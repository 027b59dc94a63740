use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::types::AppConfig;

pub const DEFAULT_CONFIG_FILE: &str = "extract-api.toml";

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub config_exists: bool,
}

/// Reads the config file, falling back to defaults when it does not exist.
///
/// The backoff section is validated here so a bad policy fails at startup.
pub fn load_config(path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = path_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let (config, config_exists) = match fs::read_to_string(&path) {
        Ok(contents) => (AppConfig::from_toml_str(&contents)?, true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (AppConfig::default(), false),
        Err(err) => return Err(ConfigError::Io(err)),
    };
    config.backoff.to_policy()?;

    Ok(LoadedConfig {
        config,
        path,
        config_exists,
    })
}
