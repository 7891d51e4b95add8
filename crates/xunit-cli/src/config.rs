//! Effective CLI settings
//!
//! Command-line flags win over `xunit.toml`, `~/.xunit/config.toml`, and
//! XUNIT_* environment variables, which are merged by `xunit-config`.

use xunit_config::{validate_prefix, Config, ConfigResult, OutputFormat};
use xunit_core::DEFAULT_PREFIX;

/// Flags as given on the command line; `false`/`None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub prefix: Option<String>,
    pub verbose: bool,
    pub json: bool,
    pub no_color: bool,
}

/// Settings after applying every configuration layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prefix: String,
    pub verbose: bool,
    pub json: bool,
    pub color: bool,
}

impl Settings {
    /// Resolve flags against loaded configuration (if any was found)
    ///
    /// A `--prefix` flag is held to the same rules as a configured prefix.
    pub fn resolve(flags: Flags, config: Option<&Config>) -> ConfigResult<Self> {
        if let Some(prefix) = &flags.prefix {
            validate_prefix(prefix)?;
        }

        let prefix = flags
            .prefix
            .or_else(|| config.and_then(|c| c.prefix()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            prefix,
            verbose: flags.verbose || config.is_some_and(|c| c.verbose()),
            json: flags.json || config.is_some_and(|c| c.format() == OutputFormat::Json),
            color: !flags.no_color && config.map_or(true, |c| c.color()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xunit_config::{GlobalConfig, OutputConfig, ProjectConfig};

    fn config_with(project: ProjectConfig) -> Config {
        Config {
            project,
            global: GlobalConfig::default(),
            project_root: None,
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(Flags::default(), None).unwrap();
        assert_eq!(
            settings,
            Settings {
                prefix: "test".to_string(),
                verbose: false,
                json: false,
                color: true,
            }
        );
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let mut project = ProjectConfig::default();
        project.set_prefix("check".to_string());
        project.output = Some(OutputConfig {
            format: Some(OutputFormat::Json),
            verbose: Some(true),
            color: Some(false),
        });
        let config = config_with(project);

        let settings = Settings::resolve(Flags::default(), Some(&config)).unwrap();
        assert_eq!(settings.prefix, "check");
        assert!(settings.json);
        assert!(settings.verbose);
        assert!(!settings.color);
    }

    #[test]
    fn test_flags_override_config() {
        let mut project = ProjectConfig::default();
        project.set_prefix("check".to_string());
        let config = config_with(project);

        let flags = Flags {
            prefix: Some("should".to_string()),
            no_color: true,
            ..Default::default()
        };
        let settings = Settings::resolve(flags, Some(&config)).unwrap();
        assert_eq!(settings.prefix, "should");
        assert!(!settings.color);
    }

    #[test]
    fn test_prefix_flag_with_whitespace_rejected() {
        let flags = Flags {
            prefix: Some("my test".to_string()),
            ..Default::default()
        };
        let err = Settings::resolve(flags, None).unwrap_err();
        assert!(err.to_string().contains("discovery.prefix"));
    }

    #[test]
    fn test_empty_prefix_flag_allowed() {
        let flags = Flags {
            prefix: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(Settings::resolve(flags, None).unwrap().prefix, "");
    }
}
