//! Generation service.
//!
//! # Data Flow
//! ```text
//! ListRequest / TableRequest
//!     → resolve model host (client-named or default, allowlist checked)
//!     → bearer token (supplied by client, else exchanged with IAM)
//!     → ModelClient::chat (system + user prompt)
//!     → extract_text (envelope → raw text)
//!     → normalize::{normalize_list, normalize_table}
//! ```
//!
//! # Design Decisions
//! - Operates on one config snapshot per request
//! - Unknown envelope: empty text for lists, an error for tables
//! - Fallback synthesis is logged and counted here, never in the normalizer

pub mod types;

pub use types::{ListRequest, ListResponse, TableRequest};

use crate::config::{RelayConfig, UpstreamConfig};
use crate::normalize::{self, NormalizedTable};
use crate::observability::metrics;
use crate::upstream::{
    extract_text, resolve_endpoint, AccessToken, ChatRequest, ModelClient, Service, TokenClient,
    UpstreamError, UpstreamResult,
};

fn list_instructions(count: usize) -> String {
    format!(
        "You generate data for software prototypes. Reply with a JSON array of exactly {count} \
         short strings and nothing else. No numbering, no explanations, no code fences."
    )
}

fn table_instructions(rows: usize, cols: usize) -> String {
    format!(
        "You generate realistic sample data for software prototypes. Reply with a single JSON \
         object of the form {{\"headers\": [...], \"rows\": [[...], ...]}} containing exactly \
         {cols} header strings and exactly {rows} rows of {cols} string cells each. \
         No explanations, no code fences."
    )
}

/// Calls the model and shapes its output.
#[derive(Clone)]
pub struct GenerationService {
    tokens: TokenClient,
    model: ModelClient,
}

impl GenerationService {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            tokens: TokenClient::new(http.clone()),
            model: ModelClient::new(http),
        }
    }

    /// Exchange the server-held API key for a token the browser can reuse.
    pub async fn issue_token(&self, config: &RelayConfig) -> UpstreamResult<AccessToken> {
        self.tokens.exchange(&config.upstream).await
    }

    /// Generate exactly `request.count` list items.
    pub async fn generate_list(
        &self,
        config: &RelayConfig,
        request: &ListRequest,
    ) -> UpstreamResult<Vec<String>> {
        let envelope = self
            .complete(
                &config.upstream,
                request.endpoint.as_deref(),
                request.access_token.as_deref(),
                list_instructions(request.count),
                &request.prompt,
            )
            .await?;

        let raw = extract_text(&envelope).unwrap_or_else(|| {
            tracing::warn!("Unrecognized model response, treating list output as empty");
            String::new()
        });

        Ok(normalize::normalize_list(&raw, request.count))
    }

    /// Generate a `request.rows` x `request.cols` table.
    pub async fn generate_table(
        &self,
        config: &RelayConfig,
        request: &TableRequest,
    ) -> UpstreamResult<NormalizedTable> {
        let envelope = self
            .complete(
                &config.upstream,
                request.endpoint.as_deref(),
                request.access_token.as_deref(),
                table_instructions(request.rows, request.cols),
                &request.prompt,
            )
            .await?;

        let raw = extract_text(&envelope).ok_or(UpstreamError::UnexpectedShape(Service::Model))?;
        let normalized = normalize::normalize_table(&raw, &request.prompt, request.rows, request.cols);

        if normalized.headers_synthesized {
            tracing::info!(cols = request.cols, "Synthesized table headers");
            metrics::record_fallback("headers");
        }
        if normalized.rows_synthesized {
            tracing::info!(rows = request.rows, "Synthesized table rows");
            metrics::record_fallback("rows");
        }

        Ok(normalized.table)
    }

    async fn complete(
        &self,
        upstream: &UpstreamConfig,
        endpoint: Option<&str>,
        access_token: Option<&str>,
        instructions: String,
        prompt: &str,
    ) -> UpstreamResult<serde_json::Value> {
        let endpoint = resolve_endpoint(endpoint, upstream)?;
        if upstream.project_id.is_empty() {
            return Err(UpstreamError::MissingCredential("project id"));
        }

        let token = match access_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => self.tokens.exchange(upstream).await?.access_token,
        };

        let request = ChatRequest::new(upstream, instructions, prompt);
        tracing::debug!(endpoint = %endpoint, model = %upstream.model_id, "Calling model");
        self.model.chat(upstream, &endpoint, &token, &request).await
    }
}
