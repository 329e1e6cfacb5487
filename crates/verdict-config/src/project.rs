//! Project Configuration (verdict.toml)
//!
//! Handles project-level configuration stored in `verdict.toml`. The global
//! file reuses the same `[runner]` and `[reporter]` tables.

use crate::{ConfigError, ConfigResult, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// File name searched for when locating a project
pub const PROJECT_CONFIG_FILE: &str = "verdict.toml";

/// Project configuration from verdict.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Test execution settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<RunnerConfig>,

    /// Output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ReporterConfig>,
}

/// `[runner]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Per-test timeout in milliseconds; absent means no timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Only run tests whose `Suite: test` name contains this text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// `[reporter]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    /// Print every test instead of one character per test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Colored output (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// "pretty" or "json"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
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

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_sections(self.runner.as_ref(), self.reporter.as_ref())
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.runner.as_ref().and_then(|r| r.timeout_ms)
    }

    pub fn filter(&self) -> Option<&str> {
        self.runner.as_ref().and_then(|r| r.filter.as_deref())
    }

    pub fn verbose(&self) -> Option<bool> {
        self.reporter.as_ref().and_then(|r| r.verbose)
    }

    pub fn color(&self) -> Option<bool> {
        self.reporter.as_ref().and_then(|r| r.color)
    }

    /// The configured output format; only meaningful after validation
    pub fn format(&self) -> Option<OutputFormat> {
        self.reporter
            .as_ref()
            .and_then(|r| r.format.as_deref())
            .and_then(|f| OutputFormat::from_str(f).ok())
    }
}

/// Shared validation for the `[runner]` and `[reporter]` tables
pub(crate) fn validate_sections(
    runner: Option<&RunnerConfig>,
    reporter: Option<&ReporterConfig>,
) -> ConfigResult<()> {
    if let Some(runner) = runner {
        if runner.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "runner.timeout_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
    }

    if let Some(format) = reporter.and_then(|r| r.format.as_deref()) {
        OutputFormat::from_str(format).map_err(|reason| ConfigError::InvalidValue {
            field: "reporter.format".to_string(),
            reason,
        })?;
    }

    Ok(())
}
