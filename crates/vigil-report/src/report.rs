//! Report builder.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vigil_core::{HealthScore, RunResult, StatusTier};

/// The immutable record of one diagnostic run.
///
/// Built once from the run's outcomes and score, written once by the
/// sink, never updated in place.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub diagnostic_timestamp: DateTime<Utc>,
    pub overall_status: StatusTier,
    /// Rounded to one decimal place for the persisted document.
    pub health_percentage: f64,
    pub tests_passed: usize,
    pub total_tests: usize,
    pub component_results: RunResult,
}

impl DiagnosticReport {
    pub fn build(run: RunResult, score: &HealthScore) -> Self {
        Self {
            diagnostic_timestamp: Utc::now(),
            overall_status: score.tier(),
            health_percentage: (score.percentage * 10.0).round() / 10.0,
            tests_passed: score.passed_count,
            total_tests: score.total_count,
            component_results: run,
        }
    }

    /// Process exit contract for CLI callers: 0 when health percentage
    /// is at least 70, 1 otherwise. Calling scripts and CI branch on
    /// this, so it must not drift.
    pub fn exit_code(&self) -> i32 {
        if self.health_percentage >= 70.0 { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::ProbeOutcome;

    fn run_of(healthy: usize, failing: usize) -> RunResult {
        let mut run = RunResult::new();
        for i in 0..healthy {
            run.insert(ProbeOutcome::healthy(format!("ok-{i}")));
        }
        for i in 0..failing {
            run.insert(ProbeOutcome::error(format!("bad-{i}"), "boom"));
        }
        run
    }

    fn report_of(healthy: usize, failing: usize) -> DiagnosticReport {
        let run = run_of(healthy, failing);
        let score = HealthScore::from_run(&run);
        DiagnosticReport::build(run, &score)
    }

    #[test]
    fn build_carries_score_and_outcomes() {
        let report = report_of(4, 1);
        assert_eq!(report.overall_status, StatusTier::Good);
        assert_eq!(report.health_percentage, 80.0);
        assert_eq!(report.tests_passed, 4);
        assert_eq!(report.total_tests, 5);
        assert_eq!(report.component_results.len(), 5);
    }

    #[test]
    fn percentage_is_rounded_to_one_decimal() {
        // 2 of 3 passed → 66.666...% → 66.7.
        let report = report_of(2, 1);
        assert_eq!(report.health_percentage, 66.7);
    }

    #[test]
    fn persisted_field_names_are_stable() {
        let json = serde_json::to_value(report_of(4, 1)).unwrap();
        let object = json.as_object().unwrap();
        for field in [
            "diagnostic_timestamp",
            "overall_status",
            "health_percentage",
            "tests_passed",
            "total_tests",
            "component_results",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
        assert_eq!(json["overall_status"], "GOOD");
        // ISO-8601 timestamp string.
        assert!(json["diagnostic_timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn exit_code_contract() {
        assert_eq!(report_of(4, 1).exit_code(), 0); // 80.0
        assert_eq!(report_of(7, 3).exit_code(), 0); // 70.0 exactly
        assert_eq!(report_of(3, 2).exit_code(), 1); // 60.0
        assert_eq!(report_of(0, 5).exit_code(), 1); // 0.0
    }

    #[test]
    fn all_failed_run_is_a_valid_critical_report() {
        let report = report_of(0, 5);
        assert_eq!(report.overall_status, StatusTier::Critical);
        assert_eq!(report.health_percentage, 0.0);
        assert_eq!(report.component_results.len(), 5);
    }
}
