//! Human-readable run summary.
//!
//! Probes perform no presentation side effects; whatever sink the
//! caller injects here is the single place per-probe status lines are
//! emitted, after the run has settled.

use std::fmt::Write;

use tracing::{error, info, warn};

use vigil_core::ProbeStatus;

use crate::report::DiagnosticReport;

/// Injected output abstraction for the post-run summary.
pub trait SummarySink {
    fn emit(&self, report: &DiagnosticReport);
}

/// Emits the summary through `tracing`, one line per component.
pub struct TracingSummary;

impl SummarySink for TracingSummary {
    fn emit(&self, report: &DiagnosticReport) {
        info!(
            status = %report.overall_status,
            percentage = report.health_percentage,
            passed = report.tests_passed,
            total = report.total_tests,
            "diagnostic run complete"
        );
        for outcome in report.component_results.iter() {
            match outcome.status {
                ProbeStatus::Healthy => {
                    info!(probe = %outcome.probe_name, "healthy");
                }
                ProbeStatus::Error => {
                    error!(probe = %outcome.probe_name, detail = ?outcome.detail.get("error"), "error");
                }
                status => {
                    warn!(probe = %outcome.probe_name, %status, "not healthy");
                }
            }
        }
    }
}

/// Render the summary as plain text for terminal output.
pub fn render(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "System health: {} — {:.1}% ({}/{} checks passed)",
        report.overall_status,
        report.health_percentage,
        report.tests_passed,
        report.total_tests
    )
    .expect("writing to String cannot fail");

    for outcome in report.component_results.iter() {
        let marker = match outcome.status {
            ProbeStatus::Healthy => "✓",
            ProbeStatus::Degraded => "~",
            ProbeStatus::Unknown => "?",
            ProbeStatus::Error | ProbeStatus::Timeout => "✗",
        };
        match outcome.detail.get("error").and_then(|v| v.as_str()) {
            Some(cause) => writeln!(
                out,
                "  {marker} {}: {} ({cause})",
                outcome.probe_name, outcome.status
            ),
            None => writeln!(out, "  {marker} {}: {}", outcome.probe_name, outcome.status),
        }
        .expect("writing to String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{HealthScore, ProbeOutcome, RunResult};

    fn sample_report() -> DiagnosticReport {
        let mut run = RunResult::new();
        run.insert(ProbeOutcome::healthy("api_health"));
        run.insert(ProbeOutcome::degraded("ai_service"));
        run.insert(ProbeOutcome::error("relational_store", "connection refused"));
        let score = HealthScore::from_run(&run);
        DiagnosticReport::build(run, &score)
    }

    #[test]
    fn render_has_one_line_per_component() {
        let text = render(&sample_report());
        // Header plus three component lines.
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("api_health: healthy"));
        assert!(text.contains("ai_service: degraded"));
        assert!(text.contains("relational_store: error (connection refused)"));
    }

    #[test]
    fn render_header_carries_tier_and_counts() {
        let text = render(&sample_report());
        let header = text.lines().next().unwrap();
        assert!(header.contains("CRITICAL"));
        assert!(header.contains("33.3%"));
        assert!(header.contains("1/3"));
    }
}
