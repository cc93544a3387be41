//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PluginConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "lacquer.toml";

/// Loads and validates a `lacquer.toml` configuration from a project directory.
///
/// Reads `<project_dir>/lacquer.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<PluginConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `lacquer.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PluginConfig, ConfigError> {
    let config: PluginConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
///
/// Configurations built in code should pass through here before being
/// handed to the plugin; files loaded with [`load_config`] already do.
pub fn validate_config(config: &PluginConfig) -> Result<(), ConfigError> {
    if config.cache_directory.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("cache_directory".to_string()));
    }
    if config.extension.is_empty() {
        return Err(ConfigError::MissingField("extension".to_string()));
    }
    if !config.extension.starts_with('.') {
        return Err(ConfigError::ValidationError(format!(
            "extension '{}' must start with '.'",
            config.extension
        )));
    }
    if let Err(e) = regex::Regex::new(&config.source_syntax) {
        return Err(ConfigError::ValidationError(format!(
            "invalid source_syntax pattern: {e}"
        )));
    }
    for pattern in config.include.iter().chain(&config.exclude) {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(ConfigError::ValidationError(format!(
                "invalid filter pattern '{pattern}': {e}"
            )));
        }
    }
    Ok(())
}
