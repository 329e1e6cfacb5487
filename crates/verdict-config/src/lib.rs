//! Verdict Configuration System
//!
//! Provides configuration management for the `verdict` runner including:
//! - Project configuration (verdict.toml)
//! - Global user configuration (~/.verdict/config.toml)
//! - Environment overrides and precedence
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.verdict/config.toml)
//! 2. Project config (./verdict.toml, searched upwards)
//! 3. Environment variables (VERDICT_*, NO_COLOR)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use verdict_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("timeout: {:?}", config.timeout());
//! ```

pub mod global;
pub mod loader;
pub mod project;

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

/// How run results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("must be 'pretty' or 'json', got '{}'", other)),
        }
    }
}

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader, EnvOverrides};
pub use project::{ProjectConfig, ReporterConfig, RunnerConfig};
