//! Report output.

use std::fmt::Write;

use restcheck_application::ScenarioReport;

const NAME_WIDTH: usize = 36;

/// Renders reports as a plain text table followed by failure details.
#[must_use]
pub fn render_table(reports: &[ScenarioReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:>6} {:>6} {:>6}  STATUS",
        "SCENARIO", "CHECKS", "PASSED", "FAILED"
    );

    for report in reports {
        let status = if report.fatal.is_some() {
            "ABORTED"
        } else if report.all_passed() {
            "PASS"
        } else {
            "FAIL"
        };
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {:>6} {:>6} {:>6}  {status}",
            report.scenario,
            report.total(),
            report.passed(),
            report.failed(),
        );
    }

    for report in reports.iter().filter(|r| !r.all_passed()) {
        let _ = writeln!(out, "\n{}:", report.scenario);
        for failure in report.failures() {
            let _ = write!(out, "  FAIL {}", failure.description);
            if let Some(error) = &failure.error {
                let _ = write!(out, ": {error}");
            }
            out.push('\n');
        }
        if let Some(fatal) = &report.fatal {
            let _ = writeln!(out, "  ABORTED {fatal}");
        }
    }

    let failed = reports.iter().filter(|r| !r.all_passed()).count();
    let _ = writeln!(
        out,
        "\n{} scenarios, {} passed, {failed} failed",
        reports.len(),
        reports.len() - failed
    );
    out
}

/// Renders reports as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(reports: &[ScenarioReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
