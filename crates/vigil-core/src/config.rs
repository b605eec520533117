//! vigil.toml configuration parser.
//!
//! Every section is optional; missing values fall back to the defaults
//! the diagnostic has always shipped with. Environment variables take
//! precedence over the file so operators can point a single run at a
//! different target without editing config:
//!
//! - `API_BASE_URL`   — API and AI service base URL
//! - `EDGE_API_URL`   — edge endpoint base URL
//! - `DATABASE_URL`   — relational store connection string
//! - `DOCSTORE_URL`   — document store base URL
//! - `ML_API_URL`     — model pipeline base URL

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_EDGE_URL: &str = "http://localhost:8081";
pub const DEFAULT_REPORT_DIR: &str = "logs";
/// Default bound for remote network probes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    pub api: Option<TargetConfig>,
    pub edge: Option<TargetConfig>,
    pub document_store: Option<TargetConfig>,
    pub relational_store: Option<TargetConfig>,
    pub ml: Option<TargetConfig>,
    pub report: Option<ReportConfig>,
}

/// One probe target: an address and an optional per-target timeout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    pub url: Option<String>,
    /// Timeout string like "5s" or "500ms".
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub dir: Option<PathBuf>,
}

impl VigilConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from an explicit path, or from `vigil.toml` in the working
    /// directory if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new("vigil.toml");
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn api_base_url(&self) -> String {
        resolve_url("API_BASE_URL", self.api.as_ref())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn edge_url(&self) -> String {
        resolve_url("EDGE_API_URL", self.edge.as_ref())
            .unwrap_or_else(|| DEFAULT_EDGE_URL.to_string())
    }

    /// Relational store connection string; `None` means not configured.
    pub fn database_url(&self) -> Option<String> {
        resolve_url("DATABASE_URL", self.relational_store.as_ref())
    }

    /// Document store base URL; `None` means not configured.
    pub fn document_store_url(&self) -> Option<String> {
        resolve_url("DOCSTORE_URL", self.document_store.as_ref())
    }

    /// Model pipeline base URL. Defaults to the API base URL — the
    /// pipeline status endpoint rides the main API service.
    pub fn ml_url(&self) -> String {
        resolve_url("ML_API_URL", self.ml.as_ref()).unwrap_or_else(|| self.api_base_url())
    }

    pub fn api_timeout(&self) -> Duration {
        target_timeout(self.api.as_ref())
    }

    pub fn edge_timeout(&self) -> Duration {
        target_timeout(self.edge.as_ref())
    }

    pub fn document_store_timeout(&self) -> Duration {
        target_timeout(self.document_store.as_ref())
    }

    pub fn relational_store_timeout(&self) -> Duration {
        target_timeout(self.relational_store.as_ref())
    }

    pub fn ml_timeout(&self) -> Duration {
        target_timeout(self.ml.as_ref())
    }

    pub fn report_dir(&self) -> PathBuf {
        self.report
            .as_ref()
            .and_then(|r| r.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR))
    }
}

fn resolve_url(env_key: &str, target: Option<&TargetConfig>) -> Option<String> {
    if let Ok(value) = std::env::var(env_key) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    target.and_then(|t| t.url.clone())
}

fn target_timeout(target: Option<&TargetConfig>) -> Duration {
    target
        .and_then(|t| t.timeout.as_deref())
        .and_then(parse_duration)
        .unwrap_or(DEFAULT_TIMEOUT)
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
