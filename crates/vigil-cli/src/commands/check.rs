//! The `vigil check` command — one full diagnostic run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use vigil_core::{HealthScore, VigilConfig};
use vigil_probe::{
    AiServiceProbe, ApiHealthProbe, DocumentStoreProbe, EdgeProbe, MlPipelineProbe, Orchestrator,
    ProbeRegistry, RelationalStoreProbe, SystemStatusProbe, UnconfiguredProbe,
};
use vigil_report::{
    DiagnosticReport, ReportSink, SinkResult, SummarySink, TracingSummary, render,
};

use crate::collaborators::{HttpDocumentStore, HttpModelPipeline, PgRelationalStore};

pub async fn check(
    config_path: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    format: &str,
    timeout_secs: Option<u64>,
) -> anyhow::Result<i32> {
    let config = VigilConfig::load(config_path.as_deref())?;
    let timeout_override = timeout_secs.map(Duration::from_secs);

    let registry = build_registry(&config, timeout_override)?;
    info!(probes = registry.len(), "starting diagnostic run");

    let dir = report_dir.unwrap_or_else(|| config.report_dir());
    let (report, persisted) = run_diagnostic(&Orchestrator::new(), registry, &dir).await;
    if let Err(e) = &persisted {
        error!(error = %e, "failed to persist diagnostic report");
    }

    TracingSummary.emit(&report);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render(&report)),
    }

    Ok(report.exit_code())
}

/// Run the probes, build the report, and attempt persistence.
///
/// Persistence failure is returned alongside the report rather than
/// replacing it — the in-memory report and the exit contract are
/// unaffected by a sink fault.
pub(crate) async fn run_diagnostic(
    orchestrator: &Orchestrator,
    registry: ProbeRegistry,
    report_dir: &Path,
) -> (DiagnosticReport, SinkResult<PathBuf>) {
    let run = orchestrator.run_all(registry).await;
    let score = HealthScore::from_run(&run);
    let report = DiagnosticReport::build(run, &score);
    let persisted = ReportSink::new(report_dir).persist(&report);
    (report, persisted)
}

/// Assemble the full probe registry from configuration.
///
/// Every subsystem gets a registry slot even when its collaborator is
/// not configured, so the report shape never depends on deployment
/// configuration.
fn build_registry(
    config: &VigilConfig,
    timeout_override: Option<Duration>,
) -> anyhow::Result<ProbeRegistry> {
    let api_url = config.api_base_url();
    let api_timeout = timeout_override.unwrap_or_else(|| config.api_timeout());

    let mut registry = ProbeRegistry::new();
    registry.register(Box::new(ApiHealthProbe::new(api_url.clone(), api_timeout)))?;
    registry.register(Box::new(SystemStatusProbe::new(api_url.clone(), api_timeout)))?;

    match config.document_store_url() {
        Some(url) => {
            let timeout = timeout_override.unwrap_or_else(|| config.document_store_timeout());
            let store = Arc::new(HttpDocumentStore::new(url, timeout));
            registry.register(Box::new(DocumentStoreProbe::new(store, timeout)))?;
        }
        None => {
            registry.register(Box::new(UnconfiguredProbe::new(DocumentStoreProbe::NAME)))?;
        }
    }

    match config.database_url() {
        Some(url) => {
            let timeout = timeout_override.unwrap_or_else(|| config.relational_store_timeout());
            let store = Arc::new(PgRelationalStore::new(url));
            registry.register(Box::new(RelationalStoreProbe::new(store, timeout)))?;
        }
        None => {
            registry.register(Box::new(UnconfiguredProbe::new(RelationalStoreProbe::NAME)))?;
        }
    }

    registry.register(Box::new(AiServiceProbe::new(api_url, api_timeout)))?;

    let ml_timeout = timeout_override.unwrap_or_else(|| config.ml_timeout());
    let pipeline = Arc::new(HttpModelPipeline::new(config.ml_url(), ml_timeout));
    registry.register(Box::new(MlPipelineProbe::new(pipeline, ml_timeout)))?;

    let edge_timeout = timeout_override.unwrap_or_else(|| config.edge_timeout());
    registry.register(Box::new(EdgeProbe::new(config.edge_url(), edge_timeout)))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    use vigil_core::{ProbeOutcome, ProbeStatus, StatusTier};
    use vigil_probe::{BoxFuture, Probe};

    struct StaticProbe {
        name: &'static str,
        status: ProbeStatus,
    }

    impl Probe for StaticProbe {
        fn name(&self) -> &str {
            self.name
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
            Box::pin(async move { ProbeOutcome::new(self.name, self.status) })
        }
    }

    struct HangingProbe {
        name: &'static str,
    }

    impl Probe for HangingProbe {
        fn name(&self) -> &str {
            self.name
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(10)
        }

        fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(600)).await;
                ProbeOutcome::healthy(self.name)
            })
        }
    }

    #[test]
    fn registry_covers_every_subsystem_in_order() {
        let config = VigilConfig::default();
        let registry = build_registry(&config, None).unwrap();

        assert_eq!(
            registry.names(),
            vec![
                "api_health",
                "system_status",
                "document_store",
                "relational_store",
                "ai_service",
                "ml_pipeline",
                "edge_devices",
            ]
        );
    }

    #[tokio::test]
    async fn four_of_five_healthy_is_good_and_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ProbeRegistry::new();
        for name in ["api_health", "system_status", "document_store", "ai_service"] {
            registry
                .register(Box::new(StaticProbe {
                    name,
                    status: ProbeStatus::Healthy,
                }))
                .unwrap();
        }
        registry
            .register(Box::new(StaticProbe {
                name: "relational_store",
                status: ProbeStatus::Error,
            }))
            .unwrap();

        let (report, persisted) =
            run_diagnostic(&Orchestrator::new(), registry, dir.path()).await;

        assert_eq!(report.health_percentage, 80.0);
        assert_eq!(report.overall_status, StatusTier::Good);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.component_results.len(), 5);
        assert!(persisted.unwrap().exists());
    }

    #[tokio::test]
    async fn full_network_partition_is_critical_and_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ProbeRegistry::new();
        for name in ["p1", "p2", "p3", "p4", "p5"] {
            registry.register(Box::new(HangingProbe { name })).unwrap();
        }

        let (report, persisted) = run_diagnostic(
            &Orchestrator::with_grace(Duration::from_millis(50)),
            registry,
            dir.path(),
        )
        .await;

        assert_eq!(report.health_percentage, 0.0);
        assert_eq!(report.overall_status, StatusTier::Critical);
        assert_eq!(report.exit_code(), 1);

        // The report still persisted, with all five entries recorded
        // as timeouts.
        let path = persisted.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let components = json["component_results"].as_object().unwrap();
        assert_eq!(components.len(), 5);
        for (_, body) in components {
            assert_eq!(body["status"], "timeout");
        }
    }

    #[tokio::test]
    async fn persistence_failure_leaves_report_and_exit_code_intact() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(StaticProbe {
                name: "api_health",
                status: ProbeStatus::Healthy,
            }))
            .unwrap();

        let (report, persisted) = run_diagnostic(
            &Orchestrator::new(),
            registry,
            Path::new("/proc/vigil-definitely-not-writable"),
        )
        .await;

        assert!(persisted.is_err());
        assert_eq!(report.health_percentage, 100.0);
        assert_eq!(report.exit_code(), 0);
    }
}
