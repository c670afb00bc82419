//! Model hosting client and response envelope handling.
//!
//! # Responsibilities
//! - Resolve which model host to call (client-named or default)
//! - Send chat-style requests with the server-held project and model ids
//! - Pull the generated text out of whichever envelope shape came back

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::{Service, UpstreamError, UpstreamResult};

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat request body sent to the model host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model_id: String,
    pub project_id: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl ChatRequest {
    /// Build a system+user request with sampling parameters from `upstream`.
    pub fn new(upstream: &UpstreamConfig, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model_id: upstream.model_id.clone(),
            project_id: upstream.project_id.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: upstream.max_tokens,
            temperature: upstream.temperature,
            top_p: upstream.top_p,
        }
    }
}

/// Sends chat requests to the model host.
#[derive(Clone)]
pub struct ModelClient {
    http: reqwest::Client,
}

impl ModelClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST `request` to `{endpoint}{chat_path}` and return the raw envelope.
    pub async fn chat(
        &self,
        upstream: &UpstreamConfig,
        endpoint: &str,
        token: &str,
        request: &ChatRequest,
    ) -> UpstreamResult<Value> {
        let url = format!("{}{}", endpoint.trim_end_matches('/'), upstream.chat_path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(request)
            .timeout(Duration::from_secs(upstream.timeout_secs))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Model request rejected");
            metrics::record_upstream(Service::Model.label(), "error");
            return Err(UpstreamError::Status {
                service: Service::Model,
                status: status.as_u16(),
            });
        }

        let envelope = response.json::<Value>().await.map_err(transport)?;
        metrics::record_upstream(Service::Model.label(), "ok");
        Ok(envelope)
    }
}

fn transport(source: reqwest::Error) -> UpstreamError {
    metrics::record_upstream(Service::Model.label(), "error");
    UpstreamError::Transport {
        service: Service::Model,
        source,
    }
}

/// Extract generated text from a response envelope.
///
/// Known shapes, in order: chat `choices[0].message.content`, legacy
/// `results[0].generated_text`, generic `output`. A non-string `output` is
/// returned as its JSON text. `None` when no shape matches.
pub fn extract_text(envelope: &Value) -> Option<String> {
    if let Some(text) = envelope
        .pointer("/choices/0/message/content")
        .or_else(|| envelope.pointer("/results/0/generated_text"))
        .and_then(Value::as_str)
    {
        return Some(text.to_string());
    }

    match envelope.get("output")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Pick the model host for a request.
///
/// An omitted or blank `requested` endpoint falls back to
/// `upstream.default_endpoint`. A named endpoint must be http(s) and, when
/// `allowed_endpoints` is non-empty, share an origin with one of them.
pub fn resolve_endpoint(requested: Option<&str>, upstream: &UpstreamConfig) -> UpstreamResult<String> {
    let requested = match requested.map(str::trim).filter(|e| !e.is_empty()) {
        Some(endpoint) => endpoint,
        None => return Ok(upstream.default_endpoint.clone()),
    };

    let url = Url::parse(requested)
        .map_err(|e| UpstreamError::InvalidEndpoint(format!("'{}': {}", requested, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UpstreamError::InvalidEndpoint(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if !upstream.allowed_endpoints.is_empty() {
        let allowed = upstream
            .allowed_endpoints
            .iter()
            .filter_map(|e| Url::parse(e).ok())
            .any(|e| e.origin() == url.origin());
        if !allowed {
            return Err(UpstreamError::InvalidEndpoint(format!(
                "'{}' is not an allowed model host",
                requested
            )));
        }
    }

    Ok(requested.to_string())
}
