//! Test reporter - human-readable run output

use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use verdict_runtime::{TestResult, TestSummary};

/// Test reporter with output configuration
pub struct TestReporter {
    /// One line per test instead of a dot
    verbose: bool,
    color: bool,
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TestReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        super::paint(text, self.color)
    }

    /// Write the full report for one run.
    pub fn report<W: Write>(&self, out: &mut W, results: &[TestResult]) -> io::Result<()> {
        for result in results {
            self.write_result(out, result)?;
        }

        // dots need a newline
        if !self.verbose && !results.is_empty() {
            writeln!(out)?;
        }

        writeln!(out)?;
        self.write_summary(out, results)?;
        self.write_failures(out, results)
    }

    fn write_result<W: Write>(&self, out: &mut W, result: &TestResult) -> io::Result<()> {
        match (self.verbose, result.passed) {
            (true, true) => writeln!(
                out,
                "  {} {} ({:.2}ms)",
                self.paint("✓".green().bold()),
                result.name,
                result.duration
            ),
            (true, false) => writeln!(
                out,
                "  {} {} ({:.2}ms)",
                self.paint("✗".red().bold()),
                result.name,
                result.duration
            ),
            (false, true) => {
                write!(out, "{}", self.paint(".".green()))?;
                out.flush()
            }
            (false, false) => {
                write!(out, "{}", self.paint("F".red().bold()))?;
                out.flush()
            }
        }
    }

    fn write_summary<W: Write>(&self, out: &mut W, results: &[TestResult]) -> io::Result<()> {
        let summary = TestSummary::from_results(results);

        writeln!(out, "{}", "─".repeat(50))?;

        let status = if summary.all_passed() {
            self.paint("PASSED".green().bold())
        } else {
            self.paint("FAILED".red().bold())
        };
        let failed = if summary.failed > 0 {
            self.paint(summary.failed.to_string().red().bold())
        } else {
            summary.failed.to_string().normal()
        };

        writeln!(
            out,
            "Test result: {} | {} total, {} passed, {} failed",
            status,
            self.paint(summary.total.to_string().bold()),
            self.paint(summary.passed.to_string().green().bold()),
            failed
        )?;
        writeln!(out, "Pass rate: {:.1}%", summary.pass_rate)?;
        writeln!(out, "Time: {:.2}ms", summary.duration)
    }

    fn write_failures<W: Write>(&self, out: &mut W, results: &[TestResult]) -> io::Result<()> {
        let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
        if failures.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", self.paint("Failures:".red().bold()))?;
        writeln!(out)?;

        for result in failures {
            writeln!(out, "  {} {}", self.paint("●".red()), self.paint(result.name.bold()))?;
            let message = result.error.as_deref().unwrap_or("unknown error");
            for line in message.lines() {
                writeln!(out, "      {}", self.paint(line.dimmed()))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(name: &str, error: Option<&str>) -> TestResult {
        TestResult {
            name: format!("Suite: {}", name),
            suite: "Suite".into(),
            passed: error.is_none(),
            error: error.map(String::from),
            duration: 1.0,
        }
    }

    fn render(reporter: TestReporter, results: &[TestResult]) -> String {
        let mut out = Vec::new();
        reporter.with_color(false).report(&mut out, results).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_quiet_report_prints_dots() {
        let output = render(
            TestReporter::new(false),
            &[result("a", None), result("b", Some("boom")), result("c", None)],
        );
        assert!(output.starts_with(".F.\n"));
        assert!(output.contains("Test result: FAILED | 3 total, 2 passed, 1 failed"));
        assert!(output.contains("  ● Suite: b\n      boom\n"));
    }

    #[test]
    fn test_verbose_report_lists_tests() {
        let output = render(TestReporter::new(true), &[result("a", None)]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "  ✓ Suite: a (1.00ms)");
        assert!(output.contains("Test result: PASSED | 1 total, 1 passed, 0 failed"));
        assert!(output.contains("Pass rate: 100.0%"));
        assert!(!output.contains("Failures:"));
    }

    #[test]
    fn test_verbose_report_snapshot() {
        let output = render(
            TestReporter::new(true),
            &[result("a", None), result("b", Some("boom"))],
        );
        insta::assert_snapshot!(output, @r"
  ✓ Suite: a (1.00ms)
  ✗ Suite: b (1.00ms)

──────────────────────────────────────────────────
Test result: FAILED | 2 total, 1 passed, 1 failed
Pass rate: 50.0%
Time: 2.00ms

Failures:

  ● Suite: b
      boom
");
    }

    #[test]
    fn test_multiline_errors_are_indented() {
        let output = render(TestReporter::new(true), &[result("a", Some("first\nsecond"))]);
        assert!(output.contains("  ✗ Suite: a (1.00ms)"));
        assert!(output.contains("      first\n      second\n"));
    }
}
