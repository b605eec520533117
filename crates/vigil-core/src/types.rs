//! Domain types for diagnostic runs.
//!
//! Every registered probe yields exactly one [`ProbeOutcome`] per run —
//! a probe that fails, panics, or times out is still recorded, never
//! silently omitted. Outcomes are collected into a [`RunResult`] in
//! registration order.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Free-form diagnostic payload attached to an outcome.
pub type Detail = serde_json::Map<String, serde_json::Value>;

/// Discrete classification of a single probe's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The check succeeded outright.
    Healthy,
    /// The subsystem responded but is in a reduced state
    /// (e.g. AI service reachable with `connected: false`).
    Degraded,
    /// Transport failure, malformed response, or assertion mismatch.
    Error,
    /// The configured bound was exceeded. Distinct from `Error`: a
    /// timeout is an expected operational condition, not a fault.
    Timeout,
    /// The probe could not be evaluated (e.g. collaborator not configured).
    Unknown,
}

impl ProbeStatus {
    /// Whether this status counts toward the passed count.
    ///
    /// Only `Healthy` passes; Degraded earns no partial credit.
    pub fn is_passing(&self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Healthy => "healthy",
            ProbeStatus::Degraded => "degraded",
            ProbeStatus::Error => "error",
            ProbeStatus::Timeout => "timeout",
            ProbeStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured result of one probe execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    /// Registered probe name, unique within a run.
    pub probe_name: String,
    pub status: ProbeStatus,
    /// Diagnostic payload (HTTP status, error message, service name, ...).
    pub detail: Detail,
    pub measured_at: DateTime<Utc>,
}

impl ProbeOutcome {
    pub fn new(probe_name: impl Into<String>, status: ProbeStatus) -> Self {
        Self {
            probe_name: probe_name.into(),
            status,
            detail: Detail::new(),
            measured_at: Utc::now(),
        }
    }

    pub fn healthy(probe_name: impl Into<String>) -> Self {
        Self::new(probe_name, ProbeStatus::Healthy)
    }

    pub fn degraded(probe_name: impl Into<String>) -> Self {
        Self::new(probe_name, ProbeStatus::Degraded)
    }

    /// An `Error` outcome with `detail.error` describing the cause.
    pub fn error(probe_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::new(probe_name, ProbeStatus::Error).with_detail("error", cause.into())
    }

    /// A `Timeout` outcome with `detail.error` describing the bound.
    pub fn timeout(probe_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::new(probe_name, ProbeStatus::Timeout).with_detail("error", cause.into())
    }

    pub fn unknown(probe_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::new(probe_name, ProbeStatus::Unknown).with_detail("error", cause.into())
    }

    /// Attach a detail entry.
    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }
}

/// All outcomes of one diagnostic run, keyed by probe name.
///
/// Insertion order is preserved so the persisted report lists components
/// in registration order. The orchestrator owns the result while the run
/// is in flight and hands it out immutably afterward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResult {
    outcomes: Vec<ProbeOutcome>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome. A second outcome under the same probe name
    /// replaces the first, so the one-outcome-per-probe invariant holds.
    pub fn insert(&mut self, outcome: ProbeOutcome) {
        match self
            .outcomes
            .iter_mut()
            .find(|o| o.probe_name == outcome.probe_name)
        {
            Some(existing) => *existing = outcome,
            None => self.outcomes.push(outcome),
        }
    }

    pub fn get(&self, probe_name: &str) -> Option<&ProbeOutcome> {
        self.outcomes.iter().find(|o| o.probe_name == probe_name)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter()
    }
}

impl Serialize for RunResult {
    /// Serializes as a JSON map of probe name → outcome body, in
    /// insertion order. The name is the key, not repeated in the value.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct OutcomeBody<'a> {
            status: ProbeStatus,
            detail: &'a Detail,
            measured_at: &'a DateTime<Utc>,
        }

        let mut map = serializer.serialize_map(Some(self.outcomes.len()))?;
        for outcome in &self.outcomes {
            map.serialize_entry(
                &outcome.probe_name,
                &OutcomeBody {
                    status: outcome.status,
                    detail: &outcome.detail,
                    measured_at: &outcome.measured_at,
                },
            )?;
        }
        map.end()
    }
}
