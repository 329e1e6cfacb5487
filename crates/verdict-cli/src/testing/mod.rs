//! Result reporting

mod reporter;

pub use reporter::TestReporter;

use colored::{ColoredString, Colorize};
use verdict_runtime::{TestResult, TestSummary};

/// `text` with its styling stripped unless `color` is on.
pub fn paint(text: ColoredString, color: bool) -> ColoredString {
    if color {
        text
    } else {
        text.clear()
    }
}

/// Machine-readable run report: the summary fields followed by `results`.
pub fn json_report(results: &[TestResult]) -> serde_json::Result<serde_json::Value> {
    let mut report = serde_json::to_value(TestSummary::from_results(results))?;
    report["results"] = serde_json::to_value(results)?;
    Ok(report)
}
