//! Durable report persistence.
//!
//! Each report is written to its own file named after the run's
//! timestamp (millisecond precision), so concurrent or repeated runs
//! never overwrite each other. The sink reports failures to the caller
//! instead of swallowing them — failing to durably record a diagnostic
//! is itself diagnostic-relevant — but persistence failure never
//! invalidates the in-memory report.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::report::DiagnosticReport;

pub type SinkResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report directory: {0}")]
    Dir(String),

    #[error("report already exists: {0}")]
    AlreadyExists(String),

    #[error("failed to write report: {0}")]
    Write(String),

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

/// Writes reports into a directory as an append-only log of runs.
pub struct ReportSink {
    dir: PathBuf,
}

impl ReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist the report and return its location.
    pub fn persist(&self, report: &DiagnosticReport) -> SinkResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ReportError::Dir(e.to_string()))?;

        let filename = format!(
            "diagnostic_report_{}.json",
            report.diagnostic_timestamp.format("%Y%m%d_%H%M%S%3f")
        );
        let path = self.dir.join(filename);

        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;

        // create_new refuses to clobber an existing report.
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    ReportError::AlreadyExists(path.display().to_string())
                } else {
                    ReportError::Write(e.to_string())
                }
            })?;
        file.write_all(&json)
            .map_err(|e| ReportError::Write(e.to_string()))?;

        info!(path = %path.display(), "diagnostic report persisted");
        Ok(path)
    }
}
