//! Wire types for the generation endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Model host base URL. Defaults to the configured endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Bearer token from `POST /token`. Exchanged server-side when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub prompt: String,
    pub count: usize,
}

/// Body of `POST /generateTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub prompt: String,
    pub rows: usize,
    pub cols: usize,
}

/// Response of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_request_wire_format() {
        let request: ListRequest = serde_json::from_str(
            r#"{"prompt": "colors", "count": 3, "accessToken": "tok"}"#,
        )
        .unwrap();

        assert_eq!(request.count, 3);
        assert_eq!(request.access_token.as_deref(), Some("tok"));
        assert_eq!(request.endpoint, None);
    }

    #[test]
    fn test_table_request_rejects_negative_rows() {
        let parsed = serde_json::from_str::<TableRequest>(r#"{"prompt": "p", "rows": -1, "cols": 2}"#);
        assert!(parsed.is_err());
    }
}
