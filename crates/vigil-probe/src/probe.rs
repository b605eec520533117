//! The probe capability.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use vigil_core::ProbeOutcome;

/// Boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single bounded check against one subsystem.
///
/// Implementations must never let a fault escape `run`: transport
/// errors, malformed responses, and assertion mismatches become `Error`
/// outcomes, exceeded bounds become `Timeout` outcomes. A probe owns its
/// transient connection for the duration of the call and releases it on
/// every exit path. Probes perform no presentation side effects — the
/// summary is emitted by the caller's sink after the run.
pub trait Probe: Send + Sync {
    /// Registered name, unique within a registry.
    fn name(&self) -> &str;

    /// The probe's own declared bound. The orchestrator enforces an
    /// independent hard bound on top of this.
    fn timeout(&self) -> Duration;

    fn run(&self) -> BoxFuture<'_, ProbeOutcome>;
}
