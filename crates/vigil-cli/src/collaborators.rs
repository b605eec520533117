//! Production collaborator implementations wired into the registry.
//!
//! The engine only declares the collaborator interfaces; these are the
//! concrete clients the CLI injects. Each call opens its own transient
//! connection and releases it on every exit path, as the probes expect.

use std::time::Duration;

use sqlx::Row;
use sqlx::postgres::PgPoolOptions;

use vigil_core::Detail;
use vigil_probe::http;
use vigil_probe::{BoxFuture, DocumentStore, ModelPipeline, ModelStatus, RelationalStore};

/// Relational store over a Postgres connection string.
pub struct PgRelationalStore {
    url: String,
}

impl PgRelationalStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RelationalStore for PgRelationalStore {
    fn execute<'a>(&'a self, query: &'a str) -> BoxFuture<'a, anyhow::Result<Vec<Vec<i64>>>> {
        Box::pin(async move {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&self.url)
                .await?;

            let result = async {
                let rows = sqlx::query(query).fetch_all(&pool).await?;
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    let value: i32 = row.try_get(0)?;
                    out.push(vec![i64::from(value)]);
                }
                Ok::<_, anyhow::Error>(out)
            }
            .await;

            // The connection is released whether the query succeeded or not.
            pool.close().await;
            result
        })
    }
}

/// Document store over its HTTP document API.
pub struct HttpDocumentStore {
    base_url: String,
    timeout: Duration,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl DocumentStore for HttpDocumentStore {
    fn write<'a>(
        &'a self,
        collection: &'a str,
        document_id: &'a str,
        fields: &'a Detail,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            let path = format!("/v1/documents/{collection}/{document_id}");
            let body = serde_json::Value::Object(fields.clone());
            let resp = http::post_json(&self.base_url, &path, &body, self.timeout).await?;
            if resp.is_success() {
                Ok(())
            } else {
                Err(anyhow::anyhow!("document write rejected: HTTP {}", resp.status))
            }
        })
    }
}

/// Model pipeline over its HTTP status endpoint.
pub struct HttpModelPipeline {
    base_url: String,
    timeout: Duration,
}

impl HttpModelPipeline {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl ModelPipeline for HttpModelPipeline {
    fn model_status(&self) -> BoxFuture<'_, anyhow::Result<ModelStatus>> {
        Box::pin(async move {
            let resp = http::get(&self.base_url, "/api/ml/status", self.timeout).await?;
            if !resp.is_success() {
                anyhow::bail!("model status check failed: HTTP {}", resp.status);
            }
            let body = resp.json()?;
            let models_loaded = body
                .get("models_loaded")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let detail = body.as_object().cloned().unwrap_or_default();
            Ok(ModelStatus {
                models_loaded,
                detail,
            })
        })
    }
}
