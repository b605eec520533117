//! Runs all registered probes concurrently with mutual isolation.
//!
//! Every probe gets its own spawned task and its own hard bound (the
//! probe's declared timeout plus a grace allowance), so one probe's
//! panic, hang, or cancellation never prevents the others from
//! completing or being recorded. The run settles in bounded time even
//! if a probe implementation misbehaves.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use vigil_core::{ProbeOutcome, RunResult};

use crate::registry::ProbeRegistry;

/// Allowance on top of each probe's declared timeout before the
/// orchestrator gives up on it.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

pub struct Orchestrator {
    grace: Duration,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            grace: DEFAULT_GRACE,
        }
    }

    /// Override the grace allowance (shorter in tests).
    pub fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }

    /// Run every registered probe concurrently and collect exactly one
    /// outcome per probe, in registration order.
    ///
    /// A probe task that panics is recorded as an `Error` outcome; one
    /// that overruns its hard bound is cancelled and recorded as
    /// `Timeout`. Re-running against the same live system reproduces
    /// the same outcome classes.
    pub async fn run_all(&self, registry: ProbeRegistry) -> RunResult {
        let mut handles: Vec<(String, JoinHandle<ProbeOutcome>)> = Vec::new();

        for probe in registry.into_probes() {
            let name = probe.name().to_string();
            let bound = probe.timeout() + self.grace;
            let handle = tokio::spawn(async move {
                match tokio::time::timeout(bound, probe.run()).await {
                    Ok(outcome) => outcome,
                    Err(_) => ProbeOutcome::timeout(
                        probe.name(),
                        format!("probe exceeded hard bound of {bound:?}"),
                    ),
                }
            });
            handles.push((name, handle));
        }

        let mut run = RunResult::new();
        for (name, handle) in handles {
            let mut outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(probe = %name, error = %e, "probe task failed");
                    ProbeOutcome::error(&name, format!("probe task failed: {e}"))
                }
            };
            // Outcomes are keyed by the registered name regardless of
            // what the probe put in its own record.
            outcome.probe_name = name;
            debug!(probe = %outcome.probe_name, status = ?outcome.status, "probe settled");
            run.insert(outcome);
        }
        run
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use vigil_core::ProbeStatus;

    use crate::probe::{BoxFuture, Probe};

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

    struct PanickingProbe;

    impl Probe for PanickingProbe {
        fn name(&self) -> &str {
            "panicking"
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
            Box::pin(async { panic!("probe blew up") })
        }
    }

    #[tokio::test]
    async fn every_probe_yields_exactly_one_outcome() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(StaticProbe {
                name: "a",
                status: ProbeStatus::Healthy,
            }))
            .unwrap();
        registry
            .register(Box::new(StaticProbe {
                name: "b",
                status: ProbeStatus::Degraded,
            }))
            .unwrap();
        registry
            .register(Box::new(StaticProbe {
                name: "c",
                status: ProbeStatus::Error,
            }))
            .unwrap();
        let registered = registry.len();

        let run = Orchestrator::new().run_all(registry).await;

        assert_eq!(run.len(), registered);
        let names: Vec<&str> = run.iter().map(|o| o.probe_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_registry_yields_empty_run() {
        let run = Orchestrator::new().run_all(ProbeRegistry::new()).await;
        assert!(run.is_empty());
    }

    #[tokio::test]
    async fn panicking_probe_becomes_error_without_aborting_siblings() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(StaticProbe {
                name: "healthy",
                status: ProbeStatus::Healthy,
            }))
            .unwrap();
        registry.register(Box::new(PanickingProbe)).unwrap();
        registry
            .register(Box::new(StaticProbe {
                name: "also_healthy",
                status: ProbeStatus::Healthy,
            }))
            .unwrap();

        let run = Orchestrator::new().run_all(registry).await;

        assert_eq!(run.len(), 3);
        assert_eq!(run.get("panicking").unwrap().status, ProbeStatus::Error);
        assert_eq!(run.get("healthy").unwrap().status, ProbeStatus::Healthy);
        assert_eq!(run.get("also_healthy").unwrap().status, ProbeStatus::Healthy);
    }

    #[tokio::test]
    async fn hanging_probe_is_cut_off_as_timeout() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(HangingProbe { name: "hanging" }))
            .unwrap();
        registry
            .register(Box::new(StaticProbe {
                name: "fast",
                status: ProbeStatus::Healthy,
            }))
            .unwrap();

        let started = Instant::now();
        let run = Orchestrator::with_grace(Duration::from_millis(50))
            .run_all(registry)
            .await;

        // Bounded well below the probe's 600s sleep.
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(run.get("hanging").unwrap().status, ProbeStatus::Timeout);
        assert_eq!(run.get("fast").unwrap().status, ProbeStatus::Healthy);
    }

    #[tokio::test]
    async fn outcome_is_rekeyed_under_registered_name() {
        struct MisnamedProbe;

        impl Probe for MisnamedProbe {
            fn name(&self) -> &str {
                "registered_name"
            }

            fn timeout(&self) -> Duration {
                Duration::from_secs(1)
            }

            fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
                Box::pin(async { ProbeOutcome::healthy("something_else") })
            }
        }

        let mut registry = ProbeRegistry::new();
        registry.register(Box::new(MisnamedProbe)).unwrap();

        let run = Orchestrator::new().run_all(registry).await;
        assert!(run.get("registered_name").is_some());
        assert!(run.get("something_else").is_none());
    }

    #[tokio::test]
    async fn all_probes_hang_run_still_settles_with_all_timeouts() {
        let mut registry = ProbeRegistry::new();
        for name in ["p1", "p2", "p3", "p4", "p5"] {
            registry.register(Box::new(HangingProbe { name })).unwrap();
        }

        let started = Instant::now();
        let run = Orchestrator::with_grace(Duration::from_millis(50))
            .run_all(registry)
            .await;

        // Concurrent, not sequential: five hanging probes settle in one
        // bound, not five.
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(run.len(), 5);
        for outcome in run.iter() {
            assert_eq!(outcome.status, ProbeStatus::Timeout);
        }
    }
}
