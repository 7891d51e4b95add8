//! Project Configuration (xunit.toml)
//!
//! Handles project-level configuration stored in `xunit.toml` at the project root.

use crate::{ConfigError, ConfigResult, OutputConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for by the loader
pub const PROJECT_CONFIG_FILE: &str = "xunit.toml";

/// Project configuration from xunit.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Test discovery settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<DiscoveryConfig>,

    /// Output preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Test discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Name prefix marking a behavior as a test (default: "test")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(prefix) = self.prefix() {
            validate_prefix(prefix)?;
        }
        Ok(())
    }

    /// Get the discovery prefix, if present
    pub fn prefix(&self) -> Option<&str> {
        self.discovery.as_ref().and_then(|d| d.prefix.as_deref())
    }

    /// Set the discovery prefix, creating the section if needed
    pub fn set_prefix(&mut self, prefix: String) {
        self.discovery.get_or_insert_with(Default::default).prefix = Some(prefix);
    }

    /// Merge another project config into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &ProjectConfig) {
        if let Some(prefix) = other.prefix() {
            self.set_prefix(prefix.to_string());
        }
        if let Some(output) = &other.output {
            self.output
                .get_or_insert_with(Default::default)
                .merge(output);
        }
    }
}

/// A prefix may be empty (match everything) but must not contain whitespace
pub fn validate_prefix(prefix: &str) -> ConfigResult<()> {
    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "discovery.prefix".to_string(),
            reason: format!("prefix cannot contain whitespace, got '{}'", prefix),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;

    #[test]
    fn test_parse_minimal_project_config() {
        let toml = r#"
[discovery]
prefix = "check"
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.prefix(), Some("check"));
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_full_project_config() {
        let toml = r#"
[discovery]
prefix = "test"

[output]
format = "json"
verbose = true
color = false
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        let output = config.output.unwrap();
        assert_eq!(output.format, Some(OutputFormat::Json));
        assert_eq!(output.verbose, Some(true));
        assert_eq!(output.color, Some(false));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
[discovery]
pattern = "test_*"
"#;

        assert!(toml::from_str::<ProjectConfig>(toml).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let toml = r#"
[output]
format = "xml"
"#;

        assert!(toml::from_str::<ProjectConfig>(toml).is_err());
    }

    #[test]
    fn test_prefix_validation() {
        assert!(validate_prefix("test").is_ok());
        assert!(validate_prefix("").is_ok());
        assert!(validate_prefix("test ").is_err());
        assert!(validate_prefix("my test").is_err());
    }

    #[test]
    fn test_merge_configs() {
        let mut base = ProjectConfig::default();
        let mut override_config = ProjectConfig::default();
        override_config.set_prefix("should".to_string());

        base.merge(&override_config);
        assert_eq!(base.prefix(), Some("should"));
    }
}
