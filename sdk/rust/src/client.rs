use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with `{ "error": ... }`.
    #[error("relay returned status {status}: {message}")]
    Relay { status: u16, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub prompt: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub prompt: String,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub event: String,
    pub anonymous_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
struct ListResponse {
    data: Vec<String>,
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Generate exactly `req.count` list items.
    pub async fn generate_list(&self, req: &ListRequest) -> Result<Vec<String>, SdkError> {
        let resp = self.client.post(self.url("/generate")).json(req).send().await?;
        let list: ListResponse = decode(resp).await?;
        Ok(list.data)
    }

    /// Generate a `req.rows` x `req.cols` table.
    pub async fn generate_table(&self, req: &TableRequest) -> Result<GeneratedTable, SdkError> {
        let resp = self.client.post(self.url("/generateTable")).json(req).send().await?;
        decode(resp).await
    }

    /// Fetch a bearer token to reuse across generation calls.
    pub async fn token(&self) -> Result<AccessToken, SdkError> {
        let resp = self.client.post(self.url("/token")).send().await?;
        decode(resp).await
    }

    pub async fn track(&self, event: &TrackEvent) -> Result<(), SdkError> {
        let resp = self.client.post(self.url("/track")).json(event).send().await?;
        let _: Value = decode(resp).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<Value, SdkError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.relay_url, path)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await?;
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        return Err(SdkError::Relay {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json().await?)
}
