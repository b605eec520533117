//! vigil-report — the persisted record of one diagnostic run.
//!
//! The builder combines a run's outcomes and score into an immutable
//! [`DiagnosticReport`]; the sink writes it once to a timestamp-unique
//! JSON file. Field names in the persisted document are stable —
//! downstream consumers branch on them:
//!
//! ```text
//! {
//!   "diagnostic_timestamp": "2026-08-06T10:15:30.123Z",
//!   "overall_status": "GOOD",
//!   "health_percentage": 80.0,
//!   "tests_passed": 4,
//!   "total_tests": 5,
//!   "component_results": { "<probe>": { "status": ..., ... } }
//! }
//! ```
//!
//! Report files accumulate as an append-only log of past runs; a run
//! never overwrites another run's report.

pub mod report;
pub mod sink;
pub mod summary;

pub use report::DiagnosticReport;
pub use sink::{ReportError, ReportSink, SinkResult};
pub use summary::{SummarySink, TracingSummary, render};
