//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` configuration from a project directory.
///
/// Reads `<project_dir>/kiln.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
pub(crate) fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.contracts.is_empty() {
        return Err(ConfigError::MissingField("project.contracts".to_string()));
    }
    if let Err(e) = semver::Version::parse(&config.compiler.version) {
        return Err(ConfigError::ValidationError(format!(
            "compiler.version '{}' is not a semantic version: {e}",
            config.compiler.version
        )));
    }
    Ok(())
}
