//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RunConfig;
use std::path::Path;

/// File name looked up when a directory is given instead of a file.
pub const CONFIG_FILE_NAME: &str = "ioplace.toml";

/// Loads and validates a run configuration.
///
/// `path` may name the configuration file itself or a directory holding an
/// `ioplace.toml`.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a run configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("design.lef", &config.design.lef),
        ("design.def", &config.design.def),
        ("design.output", &config.design.output),
    ] {
        if value.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    if config.placement.hor_layers.is_empty() && config.placement.ver_layers.is_empty() {
        return Err(ConfigError::ValidationError(
            "placement needs at least one of hor_layers or ver_layers".to_string(),
        ));
    }
    if config.placement.corner_avoidance < 0
        || config.placement.min_distance < 0
        || config.placement.pin_extension < 0
    {
        return Err(ConfigError::ValidationError(
            "placement distances must not be negative".to_string(),
        ));
    }
    for (i, c) in config.constraints.iter().enumerate() {
        if c.region.is_empty() {
            return Err(ConfigError::MissingField(format!("constraints[{i}].region")));
        }
        match (&c.direction, &c.pins) {
            (Some(_), None) => {}
            (None, Some(pins)) if !pins.is_empty() => {}
            (None, Some(_)) => {
                return Err(ConfigError::ValidationError(format!(
                    "constraints[{i}] has an empty pin list"
                )))
            }
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "constraints[{i}] needs exactly one of `direction` or `pins`"
                )))
            }
        }
    }
    Ok(())
}
