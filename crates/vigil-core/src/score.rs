//! Scoring and classification.
//!
//! The reduction is deliberately coarse: an outcome passes only when its
//! status is `Healthy`. Degraded, Error, Timeout, and Unknown all count
//! as not-passed — the per-outcome detail stays in the report for
//! diagnosis, but the score itself is binary per probe.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RunResult;

/// Pass/fail reduction of one diagnostic run.
///
/// Derived from a [`RunResult`] each run, never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthScore {
    pub passed_count: usize,
    pub total_count: usize,
    /// Passed fraction scaled to 0–100. Defined as 0 for an empty run.
    pub percentage: f64,
}

impl HealthScore {
    pub fn from_run(run: &RunResult) -> Self {
        let total_count = run.len();
        let passed_count = run.iter().filter(|o| o.status.is_passing()).count();
        let percentage = if total_count == 0 {
            0.0
        } else {
            100.0 * passed_count as f64 / total_count as f64
        };
        Self {
            passed_count,
            total_count,
            percentage,
        }
    }

    /// Classify this score into a status tier.
    pub fn tier(&self) -> StatusTier {
        StatusTier::classify(self.percentage)
    }
}

/// Coarse four-level classification of overall system health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTier {
    Excellent,
    Good,
    Degraded,
    Critical,
}

impl StatusTier {
    /// Map a health percentage onto a tier. Thresholds are evaluated in
    /// descending order, first match wins:
    ///
    /// - ≥ 90 → Excellent
    /// - ≥ 70 → Good
    /// - ≥ 50 → Degraded
    /// - otherwise → Critical
    ///
    /// These are policy constants shared with downstream consumers that
    /// branch on the tier name.
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 90.0 {
            StatusTier::Excellent
        } else if percentage >= 70.0 {
            StatusTier::Good
        } else if percentage >= 50.0 {
            StatusTier::Degraded
        } else {
            StatusTier::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Excellent => "EXCELLENT",
            StatusTier::Good => "GOOD",
            StatusTier::Degraded => "DEGRADED",
            StatusTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
