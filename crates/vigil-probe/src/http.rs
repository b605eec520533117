//! One-shot HTTP client for probes.
//!
//! Every call opens its own connection, issues a single request, and
//! drops the connection on the way out — probes never share transport
//! state. The whole exchange (connect, request, body) runs under one
//! timeout; exceeding it surfaces as [`HttpError::Timeout`], distinct
//! from transport failures.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use thiserror::Error;
use tracing::debug;

/// A completed HTTP exchange.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// `GET {base_url}{path}` with a hard timeout.
pub async fn get(base_url: &str, path: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
    request("GET", base_url, path, None, timeout).await
}

/// `POST {base_url}{path}` with a JSON body and a hard timeout.
pub async fn post_json(
    base_url: &str,
    path: &str,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    request("POST", base_url, path, Some(body), timeout).await
}

async fn request(
    method: &str,
    base_url: &str,
    path: &str,
    body: Option<&serde_json::Value>,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    let (authority, full_path) = split_url(base_url, path)?;

    let payload = match body {
        Some(value) => {
            Bytes::from(serde_json::to_vec(value).map_err(|e| HttpError::Request(e.to_string()))?)
        }
        None => Bytes::new(),
    };

    let result = tokio::time::timeout(timeout, async {
        let stream = tokio::net::TcpStream::connect(&authority)
            .await
            .map_err(|e| HttpError::Connect(e.to_string()))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| HttpError::Connect(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let mut builder = http::Request::builder()
            .method(method)
            .uri(full_path.as_str())
            .header("host", authority.as_str())
            .header("user-agent", "vigil/0.1");
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let req = builder
            .body(Full::new(payload))
            .map_err(|e| HttpError::Request(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;
        let status = resp.status().as_u16();
        let collected = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: collected.to_bytes(),
        })
    })
    .await;

    match result {
        Ok(response) => response,
        Err(_) => {
            debug!(%authority, %full_path, "http request timed out");
            Err(HttpError::Timeout)
        }
    }
}

/// Split `http://host:port/prefix` plus a request path into the connect
/// authority and the full request path. Only plain http targets are
/// supported; anything else is an invalid-url error the probe records.
fn split_url(base_url: &str, path: &str) -> Result<(String, String), HttpError> {
    let rest = base_url.strip_prefix("http://").ok_or_else(|| {
        HttpError::InvalidUrl(format!("only plain http targets are supported: {base_url}"))
    })?;

    let (authority, prefix) = match rest.find('/') {
        Some(idx) => (&rest[..idx], rest[idx..].trim_end_matches('/')),
        None => (rest, ""),
    };
    if authority.is_empty() {
        return Err(HttpError::InvalidUrl(format!("missing host: {base_url}")));
    }

    let authority = if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{authority}:80")
    };
    Ok((authority, format!("{prefix}{path}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_url_with_port() {
        let (authority, path) = split_url("http://localhost:8080", "/health").unwrap();
        assert_eq!(authority, "localhost:8080");
        assert_eq!(path, "/health");
    }

    #[test]
    fn split_url_default_port() {
        let (authority, _) = split_url("http://api.internal", "/health").unwrap();
        assert_eq!(authority, "api.internal:80");
    }

    #[test]
    fn split_url_keeps_base_prefix() {
        let (authority, path) = split_url("http://host:9000/v1/", "/health").unwrap();
        assert_eq!(authority, "host:9000");
        assert_eq!(path, "/v1/health");
    }

    #[test]
    fn split_url_rejects_https() {
        assert!(matches!(
            split_url("https://host", "/health"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[test]
    fn split_url_rejects_missing_host() {
        assert!(matches!(
            split_url("http://", "/health"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn get_to_closed_port_is_connect_error() {
        // Port 1 won't be listening.
        let err = get("http://127.0.0.1:1", "/health", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Connect(_)));
    }
}
