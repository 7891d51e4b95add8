//! Global Configuration (~/.xunit/config.toml)
//!
//! Handles user-level output preferences stored in `~/.xunit/config.toml`.

use crate::{ConfigError, ConfigResult, OutputConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.xunit/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Output preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })
    }

    /// Get the global config file path (~/.xunit/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".xunit").join("config.toml"))
    }

    /// Merge another global config into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &GlobalConfig) {
        if let Some(output) = &other.output {
            self.output
                .get_or_insert_with(Default::default)
                .merge(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;

    #[test]
    fn test_parse_global_config() {
        let toml = r#"
[output]
format = "text"
color = false
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        let output = config.output.unwrap();
        assert_eq!(output.format, Some(OutputFormat::Text));
        assert_eq!(output.color, Some(false));
        assert_eq!(output.verbose, None);
    }

    #[test]
    fn test_discovery_not_allowed_globally() {
        let toml = r#"
[discovery]
prefix = "test"
"#;

        assert!(toml::from_str::<GlobalConfig>(toml).is_err());
    }

    #[test]
    fn test_merge_configs() {
        let mut base = GlobalConfig::default();
        let override_config = GlobalConfig {
            output: Some(OutputConfig {
                verbose: Some(true),
                ..Default::default()
            }),
        };

        base.merge(&override_config);
        assert_eq!(base.output.unwrap().verbose, Some(true));
    }

    #[test]
    fn test_global_config_path_under_home() {
        if let Some(home) = dirs::home_dir() {
            let path = GlobalConfig::global_config_path().unwrap();
            assert_eq!(path, home.join(".xunit").join("config.toml"));
        }
    }
}
