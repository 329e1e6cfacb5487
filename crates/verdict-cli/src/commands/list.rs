//! List command - show registered suites without running them

use crate::suites::{self, SuiteKind};
use crate::testing::paint;
use anyhow::Result;
use colored::*;
use std::io::Write;
use verdict_runtime::TestRunner;

pub fn list(kinds: &[SuiteKind], json: bool, color: bool) -> Result<()> {
    let stdout = std::io::stdout();
    write_listing(kinds, json, color, &mut stdout.lock())
}

pub fn write_listing<W: Write>(
    kinds: &[SuiteKind],
    json: bool,
    color: bool,
    out: &mut W,
) -> Result<()> {
    let mut runner = TestRunner::new();
    suites::register(&mut runner, kinds);

    if json {
        let listing: Vec<_> = runner
            .suites()
            .iter()
            .map(|suite| {
                serde_json::json!({
                    "suite": suite.name,
                    "tests": suite.tests.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    for suite in runner.suites() {
        writeln!(out, "{} ({})", paint(suite.name.bold(), color), suite.len())?;
        for test in &suite.tests {
            writeln!(out, "  - {}", test.name)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{} tests in {} suites", runner.test_count(), runner.suites().len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_listing() {
        let mut out = Vec::new();
        write_listing(&[SuiteKind::Async], true, false, &mut out).unwrap();
        let listing: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(listing[0]["suite"], "Async API Client");
        assert_eq!(listing[0]["tests"].as_array().map(Vec::len), Some(5));
        assert_eq!(listing[0]["tests"][0], "should handle successful GET requests");
    }

    #[test]
    fn test_plain_listing_without_color() {
        let mut out = Vec::new();
        write_listing(&[SuiteKind::Async], false, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Async API Client (5)"));
        assert!(!text.contains("\x1b["));
    }
}
