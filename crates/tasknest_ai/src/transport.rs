//! AI endpoint transport.
//!
//! Defines the seam between the protocol (request building and defensive
//! decoding) and the network. The protocol only ever sees the raw response
//! envelope as JSON.

use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;
use std::time::Instant;

use crate::config::AiClientConfig;
use crate::error::{AiError, AiResult};
use crate::request::AiRequest;

/// Sends one request and returns the raw response envelope.
#[async_trait]
pub trait AiTransport: Send + Sync {
    /// Returns the parsed envelope of a successful (2xx) response.
    ///
    /// # Errors
    /// - `AiError::Endpoint` for non-success statuses and network failures.
    /// - `AiError::InvalidResponse` when the body is not JSON.
    async fn send(&self, api_key: &str, request: &AiRequest) -> AiResult<Value>;
}

/// Build a `reqwest::Client` that enforces the configured timeout.
pub fn build_http_client(config: &AiClientConfig) -> AiResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AiError::Endpoint {
            status: None,
            message: format!("failed to build HTTP client: {}", e),
        })
}

/// `reqwest`-backed transport for the responses endpoint.
pub struct ReqwestTransport {
    config: AiClientConfig,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given configuration
    pub fn new(config: AiClientConfig) -> AiResult<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl AiTransport for ReqwestTransport {
    async fn send(&self, api_key: &str, request: &AiRequest) -> AiResult<Value> {
        let started_at = Instant::now();
        let response = self
            .client
            .post(self.config.responses_url())
            .bearer_auth(api_key.trim())
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| {
                warn!(
                    "event=ai_request module=ai status=error schema={} error_code=network error={}",
                    request.schema_name, e
                );
                AiError::Endpoint {
                    status: None,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| AiError::Endpoint {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(
                "event=ai_request module=ai status=error schema={} http_status={} duration_ms={}",
                request.schema_name,
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(parse_http_error(status.as_u16(), &body_text));
        }

        info!(
            "event=ai_request module=ai status=ok schema={} model={} bytes={} duration_ms={}",
            request.schema_name,
            request.model,
            body_text.len(),
            started_at.elapsed().as_millis()
        );
        serde_json::from_str(&body_text)
            .map_err(|e| AiError::invalid_response(format!("response body is not JSON: {}", e)))
    }
}

/// Maps a non-success response to an endpoint error.
///
/// Uses `error.message` from a JSON error body when present, else the raw
/// body text.
pub fn parse_http_error(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());
    AiError::Endpoint {
        status: Some(status),
        message,
    }
}
