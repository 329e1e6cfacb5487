//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{ProjectConfig, PROJECT_CONFIG_FILE};
use crate::{ConfigError, ConfigResult, OutputFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.verdict/config.toml) - lowest priority
/// 2. Project config (./verdict.toml) - overrides global
/// 3. Environment variables (VERDICT_*, NO_COLOR) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Values read from the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// `VERDICT_TIMEOUT_MS`
    pub timeout_ms: Option<u64>,
    /// `VERDICT_FORMAT`
    pub format: Option<OutputFormat>,
    /// `VERDICT_VERBOSE`
    pub verbose: Option<bool>,
    /// `NO_COLOR` set to a non-empty value
    pub no_color: bool,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        let timeout_ms = match env::var("VERDICT_TIMEOUT_MS") {
            Ok(raw) => Some(parse_timeout("VERDICT_TIMEOUT_MS", &raw)?),
            Err(_) => None,
        };

        let format = match env::var("VERDICT_FORMAT") {
            Ok(raw) => Some(OutputFormat::from_str(&raw).map_err(|reason| {
                ConfigError::InvalidValue {
                    field: "VERDICT_FORMAT".to_string(),
                    reason,
                }
            })?),
            Err(_) => None,
        };

        let verbose = env::var("VERDICT_VERBOSE").ok().map(|v| is_truthy(&v));
        let no_color = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());

        Ok(Self {
            timeout_ms,
            format,
            verbose,
            no_color,
        })
    }
}

fn parse_timeout(field: &str, raw: &str) -> ConfigResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than 0".to_string(),
        }),
        Ok(ms) => Ok(ms),
        Err(e) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Environment overrides
    pub env: EnvOverrides,

    /// Project root directory (where verdict.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use `path` instead of `~/.verdict/config.toml`
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find verdict.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let global = self.load_global_config()?;
        let env = EnvOverrides::from_env()?;

        Ok(Config {
            project,
            global,
            env,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let global = self.load_global_config()?;
        let env = EnvOverrides::from_env()?;

        Ok(Config {
            project,
            global,
            env,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(PROJECT_CONFIG_FILE);
            if config_path.is_file() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(dir.to_path_buf()), project_config));
            }
        }
        Ok((None, ProjectConfig::default()))
    }

    /// Load global configuration; a missing file or home directory yields defaults
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match GlobalConfig::global_config_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                Err(ConfigError::HomeNotFound) => return Ok(GlobalConfig::default()),
                Err(e) => return Err(e),
            },
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Effective per-test timeout (env > project > global)
    pub fn timeout(&self) -> Option<Duration> {
        self.env
            .timeout_ms
            .or_else(|| self.project.timeout_ms())
            .or_else(|| self.global.runner.as_ref().and_then(|r| r.timeout_ms))
            .map(Duration::from_millis)
    }

    /// Effective name filter (project > global)
    pub fn filter(&self) -> Option<&str> {
        self.project.filter().or_else(|| {
            self.global
                .runner
                .as_ref()
                .and_then(|r| r.filter.as_deref())
        })
    }

    /// Effective output format (env > project > global > pretty)
    pub fn format(&self) -> OutputFormat {
        self.env
            .format
            .or_else(|| self.project.format())
            .or_else(|| {
                self.global
                    .reporter
                    .as_ref()
                    .and_then(|r| r.format.as_deref())
                    .and_then(|f| OutputFormat::from_str(f).ok())
            })
            .unwrap_or_default()
    }

    /// Effective verbosity (env > project > global > false)
    pub fn verbose(&self) -> bool {
        self.env
            .verbose
            .or_else(|| self.project.verbose())
            .or_else(|| self.global.reporter.as_ref().and_then(|r| r.verbose))
            .unwrap_or(false)
    }

    /// Whether to color output; `NO_COLOR` always wins
    pub fn color(&self) -> bool {
        if self.env.no_color {
            return false;
        }
        self.project
            .color()
            .or_else(|| self.global.reporter.as_ref().and_then(|r| r.color))
            .unwrap_or(true)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a verdict.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn isolated_loader(temp_dir: &TempDir) -> ConfigLoader {
        ConfigLoader::with_global_config_path(temp_dir.path().join("no-global.toml"))
    }

    #[test]
    #[serial]
    fn test_load_project_config() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[runner]\ntimeout_ms = 250\n");

        let config = isolated_loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert!(config.is_project());
    }

    #[test]
    #[serial]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[reporter]\nverbose = true\n");
        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let config = isolated_loader(&temp_dir).load_from_directory(&sub_dir).unwrap();

        assert!(config.verbose());
        assert_eq!(config.project_root(), Some(temp_dir.path()));
    }

    #[test]
    #[serial]
    fn test_env_override_timeout() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[runner]\ntimeout_ms = 250\n");

        env::set_var("VERDICT_TIMEOUT_MS", "900");
        let config = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("VERDICT_TIMEOUT_MS");

        assert_eq!(config.unwrap().timeout(), Some(Duration::from_millis(900)));
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("VERDICT_TIMEOUT_MS", "soon");
        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("VERDICT_TIMEOUT_MS");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_no_color_wins_over_project() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[reporter]\ncolor = true\n");

        env::set_var("NO_COLOR", "1");
        let config = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("NO_COLOR");

        assert!(!config.unwrap().color());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout(), None);
        assert_eq!(config.format(), OutputFormat::Pretty);
        assert!(!config.verbose());
        assert!(config.color());
        assert_eq!(config.filter(), None);
    }
}
