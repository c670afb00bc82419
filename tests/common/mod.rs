//! Shared utilities for integration tests: a mock upstream (IAM, model host,
//! analytics collector) and a relay wired to it.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use llm_relay::{RelayConfig, RelayServer, Shutdown};

pub const MOCK_TOKEN: &str = "mock-token";

/// Programmable upstream behaviour plus a record of what it received.
pub struct MockState {
    pub iam_status: AtomicU16,
    pub chat_status: AtomicU16,
    pub track_status: AtomicU16,
    pub chat_envelope: Mutex<Value>,
    pub token_requests: AtomicU32,
    pub last_token_form: Mutex<Option<HashMap<String, String>>>,
    pub chat_requests: AtomicU32,
    /// Authorization header and body of the last chat request.
    pub last_chat: Mutex<Option<(String, Value)>>,
    /// Authorization header and body of every tracked event.
    pub tracked: Mutex<Vec<(String, Value)>>,
}

impl MockState {
    pub fn reply_with_text(&self, text: &str) {
        *self.chat_envelope.lock().unwrap() = chat_envelope(text);
    }

    pub fn reply_with_envelope(&self, envelope: Value) {
        *self.chat_envelope.lock().unwrap() = envelope;
    }
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Chat-shaped envelope carrying `text`.
pub fn chat_envelope(text: &str) -> Value {
    json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
    })
}

fn authorization(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn status_of(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

async fn iam(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    let status = status_of(&state.iam_status);
    if !status.is_success() {
        return (status, Json(json!({ "errorMessage": "denied" }))).into_response();
    }
    *state.last_token_form.lock().unwrap() = Some(form);
    Json(json!({ "access_token": MOCK_TOKEN, "expires_in": 3600 })).into_response()
}

async fn chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.chat_requests.fetch_add(1, Ordering::SeqCst);
    *state.last_chat.lock().unwrap() = Some((authorization(&headers), body));
    let status = status_of(&state.chat_status);
    if !status.is_success() {
        return (status, "model unavailable").into_response();
    }
    let envelope = state.chat_envelope.lock().unwrap().clone();
    Json(envelope).into_response()
}

async fn track(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .tracked
        .lock()
        .unwrap()
        .push((authorization(&headers), body));
    (status_of(&state.track_status), Json(json!({ "success": true }))).into_response()
}

/// Start a mock upstream on an ephemeral port.
pub async fn start_mock_upstream() -> MockUpstream {
    let state = Arc::new(MockState {
        iam_status: AtomicU16::new(200),
        chat_status: AtomicU16::new(200),
        track_status: AtomicU16::new(200),
        chat_envelope: Mutex::new(chat_envelope("[]")),
        token_requests: AtomicU32::new(0),
        last_token_form: Mutex::new(None),
        chat_requests: AtomicU32::new(0),
        last_chat: Mutex::new(None),
        tracked: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/identity/token", post(iam))
        .route("/ml/v1/text/chat", post(chat))
        .route("/v1/track", post(track))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

/// Relay config pointing every upstream at `mock`.
pub fn relay_config(mock: &MockUpstream) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.iam_url = format!("{}/identity/token", mock.url());
    config.upstream.default_endpoint = mock.url();
    config.upstream.api_key = "test-api-key".into();
    config.upstream.project_id = "proj-test".into();
    config.upstream.timeout_secs = 5;
    config.analytics.enabled = true;
    config.analytics.collector_url = format!("{}/v1/track", mock.url());
    config.analytics.write_key = "wk".into();
    config
}

pub struct RunningRelay {
    pub url: String,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<RelayConfig>,
}

/// Start a relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig) -> RunningRelay {
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = RelayServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningRelay {
        url: format!("http://{}", addr),
        shutdown,
        config_updates,
    }
}
