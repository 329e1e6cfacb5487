//! Run command - execute the bundled suites

use crate::suites::{self, SuiteKind};
use crate::testing::{json_report, paint, TestReporter};
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::time::Duration;
use tracing::debug;
use verdict_config::{Config, OutputFormat};
use verdict_runtime::TestRunner;

/// Arguments for the run command
#[derive(Debug, Default)]
pub struct RunArgs {
    /// Suite groups to register; all when empty
    pub suites: Vec<SuiteKind>,
    /// Keep only tests whose `Suite: test` name contains this text
    pub filter: Option<String>,
    pub json: bool,
    pub verbose: bool,
    pub no_color: bool,
    pub timeout_ms: Option<u64>,
}

/// Effective settings after layering flags over configuration.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    filter: Option<String>,
    json: bool,
    verbose: bool,
    color: bool,
    timeout: Option<Duration>,
}

impl Settings {
    fn resolve(args: &RunArgs, config: &Config) -> Self {
        Self {
            filter: args
                .filter
                .clone()
                .or_else(|| config.filter().map(String::from)),
            json: args.json || config.format() == OutputFormat::Json,
            verbose: args.verbose || config.verbose(),
            color: !args.no_color && config.color(),
            timeout: args
                .timeout_ms
                .map(Duration::from_millis)
                .or_else(|| config.timeout()),
        }
    }
}

/// Run the selected suites and report to stdout. Returns whether every test passed.
pub fn run(args: &RunArgs, config: &Config) -> Result<bool> {
    let stdout = std::io::stdout();
    execute(args, config, &mut stdout.lock())
}

pub fn execute<W: Write>(args: &RunArgs, config: &Config, out: &mut W) -> Result<bool> {
    let settings = Settings::resolve(args, config);
    debug!(?settings, "resolved run settings");

    let mut runner = TestRunner::new().with_timeout(settings.timeout);
    suites::register(&mut runner, &args.suites);
    if let Some(pattern) = &settings.filter {
        runner.filter(pattern);
    }

    let count = runner.test_count();
    if count == 0 {
        if settings.json {
            writeln!(
                out,
                "{}",
                serde_json::json!({
                    "tests": 0,
                    "passed": 0,
                    "failed": 0,
                    "message": "No tests found"
                })
            )?;
        } else {
            writeln!(out, "{}", paint("No tests found.".yellow(), settings.color))?;
        }
        return Ok(true);
    }

    if !settings.json {
        writeln!(
            out,
            "Running {} test{}",
            paint(count.to_string().bold(), settings.color),
            if count == 1 { "" } else { "s" }
        )?;
        writeln!(out)?;
    }

    let results = runner
        .run_tests_blocking()
        .context("Failed to start the async runtime")?;

    if settings.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&json_report(results)?)?)?;
    } else {
        TestReporter::new(settings.verbose)
            .with_color(settings.color)
            .report(out, results)?;
    }

    Ok(results.iter().all(|r| r.passed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn execute_to_string(args: &RunArgs) -> (bool, String) {
        let mut out = Vec::new();
        let passed = execute(args, &Config::default(), &mut out).unwrap();
        (passed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs {
            filter: Some("Math".into()),
            json: true,
            no_color: true,
            timeout_ms: Some(250),
            ..Default::default()
        };
        let settings = Settings::resolve(&args, &Config::default());
        assert_eq!(
            settings,
            Settings {
                filter: Some("Math".into()),
                json: true,
                verbose: false,
                color: false,
                timeout: Some(Duration::from_millis(250)),
            }
        );
    }

    #[test]
    fn test_unit_suites_pass() {
        let args = RunArgs {
            suites: vec![SuiteKind::Unit],
            no_color: true,
            ..Default::default()
        };
        let (passed, output) = execute_to_string(&args);
        assert!(passed);
        assert!(output.starts_with("Running 15 tests\n"));
        assert!(output.contains("Test result: PASSED | 15 total, 15 passed, 0 failed"));
    }

    #[rstest]
    #[case(false, "No tests found.\n")]
    #[case(true, "{\"tests\":0,\"passed\":0,\"failed\":0,\"message\":\"No tests found\"}\n")]
    fn test_no_matching_tests(#[case] json: bool, #[case] expected: &str) {
        let args = RunArgs {
            filter: Some("nothing matches this".into()),
            json,
            no_color: true,
            ..Default::default()
        };
        let (passed, output) = execute_to_string(&args);
        assert!(passed);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_json_report_for_filtered_run() {
        let args = RunArgs {
            suites: vec![SuiteKind::Integration],
            filter: Some("Counter".into()),
            json: true,
            ..Default::default()
        };
        let (passed, output) = execute_to_string(&args);
        let report: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(passed);
        assert_eq!(report["tests"], 2);
        assert_eq!(report["pass_rate"], 100.0);
        assert_eq!(
            report["results"][0]["name"],
            "Counter with Observers: should notify observers of changes"
        );
    }
}
