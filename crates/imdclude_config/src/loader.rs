//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use std::path::Path;

/// Name of the configuration file looked for by [`discover_config`].
pub const CONFIG_FILE: &str = "imdclude.toml";

/// Loads and validates a configuration file at an explicit path.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/imdclude.toml` if present, otherwise returns the defaults.
pub fn discover_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(ToolConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
fn validate_config(config: &ToolConfig) -> Result<(), ConfigError> {
    if config.reader.buffer_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "reader.buffer_capacity must be positive".to_string(),
        ));
    }
    if config.reader.max_line_bytes < config.reader.buffer_capacity {
        return Err(ConfigError::ValidationError(
            "reader.max_line_bytes must be at least reader.buffer_capacity".to_string(),
        ));
    }
    let ext = &config.backup.extension;
    if ext.is_empty() || ext.contains('.') || ext.contains('/') {
        return Err(ConfigError::ValidationError(format!(
            "backup.extension '{ext}' must be a non-empty name without dots or slashes"
        )));
    }
    if config.lookup.dir.is_empty() {
        return Err(ConfigError::ValidationError(
            "lookup.dir must not be empty".to_string(),
        ));
    }
    Ok(())
}
