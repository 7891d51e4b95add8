//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{validate_prefix, ProjectConfig, PROJECT_CONFIG_FILE};
use crate::{parse_flag, ConfigResult, OutputConfig, OutputFormat};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.xunit/config.toml) - lowest priority
/// 2. Project config (./xunit.toml) - overrides global
/// 3. Environment variables (XUNIT_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration (with environment overrides applied)
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where xunit.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config file instead of ~/.xunit/config.toml
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find xunit.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let global_config = self.load_global_config_or_default();
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config_or_default();
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config); both are defaults when no
    /// xunit.toml exists between `start_dir` and the filesystem root
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                debug!(path = %config_path.display(), "loading project config");
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// A broken global config never blocks a run
    fn load_global_config_or_default(&mut self) -> GlobalConfig {
        match self.load_global_config() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring global config");
                GlobalConfig::default()
            }
        }
    }

    /// Load global configuration from ~/.xunit/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        // Global config is optional
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        debug!(path = %path.display(), "loading global config");
        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized: XUNIT_PREFIX, XUNIT_FORMAT, XUNIT_VERBOSE
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(prefix) = env::var("XUNIT_PREFIX") {
            validate_prefix(&prefix)?;
            config.set_prefix(prefix);
        }

        if let Ok(format) = env::var("XUNIT_FORMAT") {
            let format: OutputFormat = format.parse()?;
            config.output.get_or_insert_with(Default::default).format = Some(format);
        }

        if let Ok(verbose) = env::var("XUNIT_VERBOSE") {
            config.output.get_or_insert_with(Default::default).verbose = Some(parse_flag(&verbose));
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Discovery prefix from project config or environment, if any
    ///
    /// Callers fall back to their own default when this is `None`.
    pub fn prefix(&self) -> Option<&str> {
        self.project.prefix()
    }

    /// Effective output format (project > global > text)
    pub fn format(&self) -> OutputFormat {
        self.output_field(|o| o.format).unwrap_or_default()
    }

    /// Effective verbosity (project > global > false)
    pub fn verbose(&self) -> bool {
        self.output_field(|o| o.verbose).unwrap_or(false)
    }

    /// Effective color preference (project > global > true)
    pub fn color(&self) -> bool {
        self.output_field(|o| o.color).unwrap_or(true)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if running inside a project (has xunit.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    fn output_field<T>(&self, field: impl Fn(&OutputConfig) -> Option<T>) -> Option<T> {
        self.project
            .output
            .as_ref()
            .and_then(&field)
            .or_else(|| self.global.output.as_ref().and_then(&field))
    }
}
