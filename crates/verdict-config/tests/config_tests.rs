//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use verdict_config::{ConfigError, ConfigLoader, OutputFormat, ProjectConfig};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A temp dir holding `global.toml` and a `project/` directory.
fn layout(global: Option<&str>, project: Option<&str>) -> (TempDir, ConfigLoader, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().join("project");
    fs::create_dir(&project_dir).unwrap();

    if let Some(content) = global {
        write(temp_dir.path(), "global.toml", content);
    }
    if let Some(content) = project {
        write(&project_dir, "verdict.toml", content);
    }

    let loader = ConfigLoader::with_global_config_path(temp_dir.path().join("global.toml"));
    (temp_dir, loader, project_dir)
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
#[serial]
fn test_project_overrides_global() {
    let (_tmp, mut loader, dir) = layout(
        Some("[runner]\ntimeout_ms = 100\nfilter = \"Global\"\n[reporter]\nformat = \"json\"\n"),
        Some("[runner]\ntimeout_ms = 200\n"),
    );
    let config = loader.load_from_directory(&dir).unwrap();

    assert_eq!(config.timeout(), Some(Duration::from_millis(200)));
    // sections the project leaves out fall back to the global file
    assert_eq!(config.filter(), Some("Global"));
    assert_eq!(config.format(), OutputFormat::Json);
}

#[test]
#[serial]
fn test_env_overrides_project() {
    let (_tmp, mut loader, dir) = layout(
        None,
        Some("[reporter]\nformat = \"json\"\nverbose = false\n"),
    );

    env::set_var("VERDICT_FORMAT", "pretty");
    env::set_var("VERDICT_VERBOSE", "yes");
    let config = loader.load_from_directory(&dir);
    env::remove_var("VERDICT_FORMAT");
    env::remove_var("VERDICT_VERBOSE");

    let config = config.unwrap();
    assert_eq!(config.format(), OutputFormat::Pretty);
    assert!(config.verbose());
}

#[test]
#[serial]
fn test_global_only() {
    let (_tmp, mut loader, dir) = layout(Some("[reporter]\ncolor = false\n"), None);
    let config = loader.load_from_directory(&dir).unwrap();
    assert!(!config.is_project());
    assert!(!config.color());
}

#[test]
#[serial]
fn test_nothing_configured() {
    let (_tmp, mut loader, dir) = layout(None, None);
    let config = loader.load_from_directory(&dir).unwrap();
    assert_eq!(config.timeout(), None);
    assert_eq!(config.format(), OutputFormat::Pretty);
    assert!(config.color());
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case("[runner]\ntimeout_ms = 0\n", "runner.timeout_ms")]
#[case("[reporter]\nformat = \"yaml\"\n", "reporter.format")]
#[serial]
fn test_invalid_values(#[case] content: &str, #[case] field: &str) {
    let (_tmp, mut loader, dir) = layout(None, Some(content));
    match loader.load_from_directory(&dir) {
        Err(ConfigError::InvalidValue { field: got, .. }) => assert_eq!(got, field),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_unknown_section_is_parse_error() {
    let (_tmp, mut loader, dir) = layout(None, Some("[watch]\nenabled = true\n"));
    let err = loader.load_from_directory(&dir).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParseError { .. }));
    assert!(err.to_string().contains("verdict.toml"));
}

#[test]
#[serial]
fn test_broken_global_config_is_reported() {
    let (_tmp, mut loader, dir) = layout(Some("not toml at all ["), None);
    assert!(loader.load_from_directory(&dir).is_err());
}

#[test]
#[serial]
fn test_load_from_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "custom.toml", "[runner]\nfilter = \"Mock\"\n");

    let mut loader = ConfigLoader::with_global_config_path(temp_dir.path().join("absent.toml"));
    let config = loader.load_from_file(&path).unwrap();
    assert_eq!(config.filter(), Some("Mock"));
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
fn test_missing_specific_file() {
    let err = ProjectConfig::load_from_file(Path::new("/nonexistent/verdict.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}
