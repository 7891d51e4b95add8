//! xunit Configuration System
//!
//! Supplies the discovery prefix and output preferences to the `xunit`
//! command line. Configuration is loaded and merged in the following order
//! (later overrides earlier):
//! 1. Global config (~/.xunit/config.toml)
//! 2. Project config (./xunit.toml, searched upward)
//! 3. Environment variables (XUNIT_*)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use xunit_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("prefix: {:?}", config.prefix());
//! ```

pub mod global;
pub mod loader;
pub mod project;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How run results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason: format!("must be 'text' or 'json', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Output preferences, shared by project and global config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Result format ("text" or "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Show backtraces and the suite plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Colorize console output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl OutputConfig {
    /// Merge another output config into this one.
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &OutputConfig) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.color.is_some() {
            self.color = other.color;
        }
    }
}

/// Parse a boolean-ish environment value ("1", "true", "yes", "on")
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use project::{validate_prefix, DiscoveryConfig, ProjectConfig};
