use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Status and body of an HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }
}

/// Sends a JSON document to the daemon and hands back whatever came back.
///
/// Only transport failures (connection refused, reset, timeout) are errors here.
/// Interpreting the status and body is up to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> anyhow::Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`. Every call is a fresh request with the client's
/// default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> anyhow::Result<RawResponse> {
        // `.json()` sets `Content-Type: application/json`
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(RawResponse { status, body })
    }
}
