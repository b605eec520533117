//! vigil-probe — bounded subsystem checks and the run orchestrator.
//!
//! Each probe performs one time-limited check against one subsystem and
//! converts every possible fault into a structured outcome; nothing
//! escapes a probe's boundary. The orchestrator runs all registered
//! probes concurrently with mutual isolation.
//!
//! # Architecture
//!
//! ```text
//! ProbeRegistry (ordered, named)
//!   ├── api_health / system_status / ai_service / edge_devices
//!   │     └── http::request() over a transient connection
//!   ├── document_store / relational_store / ml_pipeline
//!   │     └── collaborator traits injected by the caller
//!   └── Orchestrator::run_all()
//!         ├── one spawned task per probe
//!         ├── hard bound per probe (declared timeout + grace)
//!         └── RunResult: exactly one outcome per probe, in order
//! ```
//!
//! A panicking probe task becomes an `Error` outcome; a probe that
//! overruns its hard bound becomes a `Timeout` outcome. Either way the
//! run completes and every registered probe is accounted for.

pub mod collaborators;
pub mod endpoints;
pub mod http;
pub mod orchestrator;
pub mod probe;
pub mod registry;

pub use collaborators::{
    DocumentStore, DocumentStoreProbe, MlPipelineProbe, ModelPipeline, ModelStatus,
    RelationalStore, RelationalStoreProbe, UnconfiguredProbe,
};
pub use endpoints::{AiServiceProbe, ApiHealthProbe, EdgeProbe, SystemStatusProbe};
pub use orchestrator::Orchestrator;
pub use probe::{BoxFuture, Probe};
pub use registry::{ProbeRegistry, RegistryError};
