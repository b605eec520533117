//! Collaborator interfaces and the probes that consume them.
//!
//! The engine does not implement the document store, the relational
//! store, or the model pipeline — it only calls their declared health
//! surfaces. The caller injects implementations at registry build time;
//! the probes here convert collaborator results into outcomes.

use std::sync::Arc;
use std::time::Duration;

use vigil_core::{Detail, ProbeOutcome};

use crate::probe::{BoxFuture, Probe};

/// Document-oriented store the primary datastore probe writes through.
pub trait DocumentStore: Send + Sync {
    fn write<'a>(
        &'a self,
        collection: &'a str,
        document_id: &'a str,
        fields: &'a Detail,
    ) -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Relational store the sentinel-query probe executes against.
pub trait RelationalStore: Send + Sync {
    fn execute<'a>(&'a self, query: &'a str) -> BoxFuture<'a, anyhow::Result<Vec<Vec<i64>>>>;
}

/// Point-in-time model pipeline status.
#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub models_loaded: bool,
    /// Pipeline-specific fields carried into the outcome detail.
    pub detail: Detail,
}

/// ML pipeline the model status probe queries.
pub trait ModelPipeline: Send + Sync {
    fn model_status(&self) -> BoxFuture<'_, anyhow::Result<ModelStatus>>;
}

// ── Document store probe ───────────────────────────────────────────

/// Write-then-confirm against the document store: a marker document is
/// written and acceptance of the write is the confirmation.
pub struct DocumentStoreProbe {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl DocumentStoreProbe {
    pub const NAME: &'static str = "document_store";

    const COLLECTION: &'static str = "system_test";
    const DOCUMENT_ID: &'static str = "diagnostic_test";

    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }
}

impl Probe for DocumentStoreProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            let mut fields = Detail::new();
            fields.insert("test".to_string(), true.into());
            fields.insert(
                "timestamp".to_string(),
                chrono::Utc::now().to_rfc3339().into(),
            );

            let write = self
                .store
                .write(Self::COLLECTION, Self::DOCUMENT_ID, &fields);
            match tokio::time::timeout(self.timeout, write).await {
                Ok(Ok(())) => {
                    ProbeOutcome::healthy(Self::NAME).with_detail("test", "write_successful")
                }
                Ok(Err(e)) => ProbeOutcome::error(Self::NAME, e.to_string()),
                Err(_) => ProbeOutcome::timeout(
                    Self::NAME,
                    format!("write not confirmed within {:?}", self.timeout),
                ),
            }
        })
    }
}

// ── Relational store probe ─────────────────────────────────────────

/// Issues `SELECT 1` and requires the returned scalar to equal the
/// sentinel exactly; any mismatch is an error, never healthy.
pub struct RelationalStoreProbe {
    store: Arc<dyn RelationalStore>,
    timeout: Duration,
}

impl RelationalStoreProbe {
    pub const NAME: &'static str = "relational_store";

    const SENTINEL_QUERY: &'static str = "SELECT 1";
    const SENTINEL: i64 = 1;

    pub fn new(store: Arc<dyn RelationalStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }
}

impl Probe for RelationalStoreProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            let query = self.store.execute(Self::SENTINEL_QUERY);
            match tokio::time::timeout(self.timeout, query).await {
                Ok(Ok(rows)) => match rows.first().and_then(|row| row.first()).copied() {
                    Some(Self::SENTINEL) => {
                        ProbeOutcome::healthy(Self::NAME).with_detail("test", "query_successful")
                    }
                    Some(other) => ProbeOutcome::error(
                        Self::NAME,
                        format!("sentinel query returned {other}, expected {}", Self::SENTINEL),
                    ),
                    None => ProbeOutcome::error(Self::NAME, "sentinel query returned no rows"),
                },
                Ok(Err(e)) => ProbeOutcome::error(Self::NAME, e.to_string()),
                Err(_) => ProbeOutcome::timeout(
                    Self::NAME,
                    format!("query not answered within {:?}", self.timeout),
                ),
            }
        })
    }
}

// ── Model pipeline probe ───────────────────────────────────────────

/// Queries the pipeline's model status and normalizes it into a
/// top-level outcome status: models loaded is healthy, reachable but
/// unloaded is degraded. The scorer never inspects pipeline-specific
/// detail fields.
pub struct MlPipelineProbe {
    pipeline: Arc<dyn ModelPipeline>,
    timeout: Duration,
}

impl MlPipelineProbe {
    pub const NAME: &'static str = "ml_pipeline";

    pub fn new(pipeline: Arc<dyn ModelPipeline>, timeout: Duration) -> Self {
        Self { pipeline, timeout }
    }
}

impl Probe for MlPipelineProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.pipeline.model_status()).await {
                Ok(Ok(status)) => {
                    let mut outcome = if status.models_loaded {
                        ProbeOutcome::healthy(Self::NAME)
                    } else {
                        ProbeOutcome::degraded(Self::NAME)
                    };
                    outcome.detail = status.detail;
                    outcome.with_detail("models_loaded", status.models_loaded)
                }
                Ok(Err(e)) => ProbeOutcome::error(Self::NAME, e.to_string()),
                Err(_) => ProbeOutcome::timeout(
                    Self::NAME,
                    format!("status not answered within {:?}", self.timeout),
                ),
            }
        })
    }
}

// ── Unconfigured slot ──────────────────────────────────────────────

/// Stand-in for a probe whose collaborator has no configured target.
/// It still yields an outcome so the report shape is independent of
/// deployment configuration.
pub struct UnconfiguredProbe {
    name: String,
}

impl UnconfiguredProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Probe for UnconfiguredProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move { ProbeOutcome::unknown(&self.name, "not configured") })
    }
}
