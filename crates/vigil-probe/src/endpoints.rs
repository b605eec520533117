//! HTTP endpoint probes.
//!
//! Four probes share the one-shot client in [`crate::http`]: the API
//! health and system status checks against the main service, the AI
//! service check (which inspects the `connected` field of the body),
//! and the edge endpoint check (where a timeout is an expected
//! operational condition, recorded as `Timeout` rather than `Error`).

use std::time::Duration;

use vigil_core::ProbeOutcome;

use crate::http::{self, HttpError};
use crate::probe::{BoxFuture, Probe};

/// Merge a JSON object body into the outcome's detail map.
fn with_body_detail(mut outcome: ProbeOutcome, body: &serde_json::Value) -> ProbeOutcome {
    if let Some(map) = body.as_object() {
        for (key, value) in map {
            outcome.detail.insert(key.clone(), value.clone());
        }
    }
    outcome
}

fn http_failure(name: &str, timeout: Duration, err: HttpError) -> ProbeOutcome {
    match err {
        HttpError::Timeout => {
            ProbeOutcome::timeout(name, format!("no response within {timeout:?}"))
        }
        other => ProbeOutcome::error(name, other.to_string()),
    }
}

// ── API health ─────────────────────────────────────────────────────

/// `GET {api}/health` — healthy requires HTTP 200 and a decodable body.
pub struct ApiHealthProbe {
    base_url: String,
    timeout: Duration,
}

impl ApiHealthProbe {
    pub const NAME: &'static str = "api_health";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Probe for ApiHealthProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            match http::get(&self.base_url, "/health", self.timeout).await {
                Ok(resp) if resp.is_success() => match resp.json() {
                    Ok(body) => {
                        let service = body
                            .get("service")
                            .and_then(|v| v.as_str())
                            .unwrap_or("unknown")
                            .to_string();
                        ProbeOutcome::healthy(Self::NAME).with_detail("service", service)
                    }
                    Err(e) => {
                        ProbeOutcome::error(Self::NAME, format!("undecodable health body: {e}"))
                    }
                },
                Ok(resp) => ProbeOutcome::error(Self::NAME, format!("HTTP {}", resp.status))
                    .with_detail("http_status", resp.status),
                Err(e) => http_failure(Self::NAME, self.timeout, e),
            }
        })
    }
}

// ── System status ──────────────────────────────────────────────────

/// `GET {api}/api/system/status` — the API probe's companion check,
/// registered separately so every registry entry yields one outcome.
pub struct SystemStatusProbe {
    base_url: String,
    timeout: Duration,
}

impl SystemStatusProbe {
    pub const NAME: &'static str = "system_status";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Probe for SystemStatusProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            match http::get(&self.base_url, "/api/system/status", self.timeout).await {
                Ok(resp) if resp.is_success() => match resp.json() {
                    Ok(body) => with_body_detail(ProbeOutcome::healthy(Self::NAME), &body),
                    Err(e) => {
                        ProbeOutcome::error(Self::NAME, format!("undecodable status body: {e}"))
                    }
                },
                Ok(resp) => ProbeOutcome::error(Self::NAME, format!("HTTP {}", resp.status))
                    .with_detail("http_status", resp.status),
                Err(e) => http_failure(Self::NAME, self.timeout, e),
            }
        })
    }
}

// ── AI service ─────────────────────────────────────────────────────

/// `GET {api}/api/ai/health` — HTTP 200 with `connected: false` is a
/// reduced state, classified `Degraded` rather than `Healthy`.
pub struct AiServiceProbe {
    base_url: String,
    timeout: Duration,
}

impl AiServiceProbe {
    pub const NAME: &'static str = "ai_service";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Probe for AiServiceProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            match http::get(&self.base_url, "/api/ai/health", self.timeout).await {
                Ok(resp) if resp.is_success() => match resp.json() {
                    Ok(body) => {
                        let connected =
                            body.get("connected").and_then(|v| v.as_bool()).unwrap_or(false);
                        let outcome = if connected {
                            ProbeOutcome::healthy(Self::NAME)
                        } else {
                            ProbeOutcome::degraded(Self::NAME)
                        };
                        with_body_detail(outcome, &body).with_detail("connected", connected)
                    }
                    Err(e) => ProbeOutcome::error(Self::NAME, format!("undecodable ai body: {e}")),
                },
                Ok(resp) => ProbeOutcome::error(Self::NAME, format!("HTTP {}", resp.status))
                    .with_detail("http_status", resp.status),
                Err(e) => http_failure(Self::NAME, self.timeout, e),
            }
        })
    }
}

// ── Edge endpoint ──────────────────────────────────────────────────

/// `GET {edge}/health` with a strict bound. An absent edge fleet is an
/// expected condition: exceeding the bound maps to `Timeout`, while a
/// refused connection or bad response maps to `Error`.
pub struct EdgeProbe {
    edge_url: String,
    timeout: Duration,
}

impl EdgeProbe {
    pub const NAME: &'static str = "edge_devices";

    pub fn new(edge_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            edge_url: edge_url.into(),
            timeout,
        }
    }
}

impl Probe for EdgeProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self) -> BoxFuture<'_, ProbeOutcome> {
        Box::pin(async move {
            match http::get(&self.edge_url, "/health", self.timeout).await {
                Ok(resp) if resp.is_success() => match resp.json() {
                    Ok(body) => ProbeOutcome::healthy(Self::NAME).with_detail("health", body),
                    Err(e) => {
                        ProbeOutcome::error(Self::NAME, format!("undecodable edge body: {e}"))
                    }
                },
                Ok(resp) => ProbeOutcome::error(Self::NAME, format!("HTTP {}", resp.status))
                    .with_detail("http_status", resp.status),
                Err(HttpError::Timeout) => {
                    ProbeOutcome::timeout(Self::NAME, "edge service not responding")
                }
                Err(e) => ProbeOutcome::error(Self::NAME, e.to_string()),
            }
        })
    }
}
