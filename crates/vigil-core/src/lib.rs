//! vigil-core — domain types, scoring, and configuration for Vigil.
//!
//! A diagnostic run produces one [`ProbeOutcome`] per registered probe,
//! collected into a [`RunResult`]. The scorer reduces the run to a
//! [`HealthScore`] (passed/total/percentage) and the classifier maps the
//! percentage onto a [`StatusTier`]:
//!
//! ```text
//! RunResult ──► HealthScore ──► StatusTier
//!   (outcomes)    (pass/fail)     (≥90 EXCELLENT, ≥70 GOOD,
//!                                  ≥50 DEGRADED, else CRITICAL)
//! ```
//!
//! The thresholds are policy constants; downstream consumers branch on
//! the tier names, so they must not drift.

pub mod config;
pub mod error;
pub mod score;
pub mod types;

pub use config::VigilConfig;
pub use error::ConfigError;
pub use score::{HealthScore, StatusTier};
pub use types::{Detail, ProbeOutcome, ProbeStatus, RunResult};
