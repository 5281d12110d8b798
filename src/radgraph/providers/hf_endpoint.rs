//! Hosted inference endpoint provider.
//!
//! Sends a report to `<base_url>/<model_id>` with bearer authentication and
//! returns the response body as raw JSON — output shapes vary between model
//! versions, so normalization lives downstream in [`crate::annotation`].
//! All wire types are private to this module.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, trace};

use crate::radgraph::ProviderError;

/// Adapter for a hosted graph-extraction model behind an HTTP(S) endpoint.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct HfEndpointProvider {
    client: Client,
    api_base_url: String,
    api_token: String,
}

impl HfEndpointProvider {
    /// Build a provider from config values. The token is sent as
    /// `Authorization: Bearer <token>` on every request.
    pub fn new(
        api_base_url: String,
        api_token: String,
        timeout_seconds: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, api_token })
    }

    /// Lightweight reachability probe.
    ///
    /// Sends a HEAD request to the base endpoint. Any HTTP response
    /// (including 4xx) means the server is reachable; only a transport-level
    /// failure (connection refused, timeout) is treated as unreachable.
    ///
    /// Uses a hard 5-second timeout regardless of the request timeout config.
    pub async fn ping(&self) -> Result<(), ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build ping client: {e}")))?;
        client
            .head(&self.api_base_url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProviderError::Request(format!("unreachable: {e}")))
    }

    /// Run one inference round-trip for `report` against `model_id`.
    pub async fn annotate(&self, report: &str, model_id: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/{model_id}", self.api_base_url);
        let payload = InferenceRequest { inputs: report };

        debug!(%url, report_len = report.len(), "sending inference request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "inference HTTP request failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize inference response");
            ProviderError::Api(format!("failed to parse response body: {e}"))
        })?;

        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&parsed)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(response = %json, "full inference response payload");
        }

        Ok(parsed)
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Consume the response and return it if successful, or a structured error.
///
/// The hosted endpoint reports failures as `{"error": "..."}`, sometimes
/// with an array of messages; fall back to the raw body otherwise.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<Value>(&body).ok().and_then(envelope_message) {
        Some(msg) => format!("HTTP {status}: {msg}"),
        None => format!("HTTP {status}: {body}"),
    };

    error!(%status, %message, "inference request returned HTTP error");
    Err(ProviderError::Api(message))
}

fn envelope_message(body: Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}
