//! Failure injection tests for the relay.

use sdk_rust::{ListRequest, RelayClient, SdkError, TableRequest, TrackEvent};
use serde_json::{json, Map};
use std::sync::atomic::Ordering;

mod common;

fn list_request(count: usize) -> ListRequest {
    ListRequest {
        prompt: "fruit".into(),
        count,
        ..Default::default()
    }
}

fn table_request(rows: usize, cols: usize) -> TableRequest {
    TableRequest {
        prompt: "inventory".into(),
        rows,
        cols,
        ..Default::default()
    }
}

fn expect_relay_error(err: SdkError) -> (u16, String) {
    match err {
        SdkError::Relay { status, message } => (status, message),
        other => panic!("expected relay error, got {other}"),
    }
}

#[tokio::test]
async fn test_iam_rejection_is_bad_gateway() {
    let mock = common::start_mock_upstream().await;
    mock.state.iam_status.store(401, Ordering::SeqCst);
    let relay = common::start_relay(common::relay_config(&mock)).await;
    let client = RelayClient::new(&relay.url);

    let (status, message) = expect_relay_error(client.generate_list(&list_request(3)).await.unwrap_err());
    assert_eq!(status, 502);
    assert_eq!(message, "credential service returned status 401");

    let (status, _) = expect_relay_error(client.token().await.unwrap_err());
    assert_eq!(status, 502);

    assert_eq!(mock.state.chat_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_model_failure_is_bad_gateway() {
    let mock = common::start_mock_upstream().await;
    mock.state.chat_status.store(500, Ordering::SeqCst);
    let relay = common::start_relay(common::relay_config(&mock)).await;

    let (status, message) = expect_relay_error(
        RelayClient::new(&relay.url)
            .generate_table(&table_request(2, 2))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 502);
    assert_eq!(message, "model service returned status 500");
    // No retries.
    assert_eq!(mock.state.chat_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_model_host() {
    let mock = common::start_mock_upstream().await;
    let mut config = common::relay_config(&mock);
    // Nothing listens on the discard port.
    config.upstream.default_endpoint = "http://127.0.0.1:9".into();
    let relay = common::start_relay(config).await;

    let (status, message) = expect_relay_error(
        RelayClient::new(&relay.url)
            .generate_list(&list_request(2))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 502);
    assert_eq!(message, "model service is unreachable");
}

#[tokio::test]
async fn test_unknown_envelope_list_is_empty_strings() {
    let mock = common::start_mock_upstream().await;
    mock.state.reply_with_envelope(json!({ "unexpected": true }));
    let relay = common::start_relay(common::relay_config(&mock)).await;

    let data = RelayClient::new(&relay.url)
        .generate_list(&list_request(3))
        .await
        .unwrap();
    assert_eq!(data, vec!["", "", ""]);
}

#[tokio::test]
async fn test_unknown_envelope_table_is_error() {
    let mock = common::start_mock_upstream().await;
    mock.state.reply_with_envelope(json!({ "unexpected": true }));
    let relay = common::start_relay(common::relay_config(&mock)).await;

    let (status, message) = expect_relay_error(
        RelayClient::new(&relay.url)
            .generate_table(&table_request(2, 2))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 502);
    assert_eq!(message, "Unexpected response structure");
}

#[tokio::test]
async fn test_garbage_output_still_exact_size() {
    let mock = common::start_mock_upstream().await;
    mock.state.reply_with_text("{\"headers\": [\"A\"], \"rows\": 42");
    let relay = common::start_relay(common::relay_config(&mock)).await;

    let table = RelayClient::new(&relay.url)
        .generate_table(&table_request(4, 5))
        .await
        .unwrap();
    assert_eq!(table.headers.len(), 5);
    assert_eq!(table.rows.len(), 4);
    assert!(table.rows.iter().all(|row| row.len() == 5));
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let mock = common::start_mock_upstream().await;
    let mut config = common::relay_config(&mock);
    config.upstream.api_key = String::new();
    let relay = common::start_relay(config).await;

    let (status, message) = expect_relay_error(
        RelayClient::new(&relay.url)
            .generate_list(&list_request(1))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 500);
    assert!(!message.contains("api"));
    assert_eq!(mock.state.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_collector_failure_still_acknowledged() {
    let mock = common::start_mock_upstream().await;
    mock.state.track_status.store(503, Ordering::SeqCst);
    let relay = common::start_relay(common::relay_config(&mock)).await;

    let event = TrackEvent {
        event: "page_view".into(),
        anonymous_id: "anon".into(),
        properties: Map::new(),
        timestamp: None,
    };
    RelayClient::new(&relay.url).track(&event).await.unwrap();
    assert_eq!(mock.state.tracked.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_disabled_analytics_not_forwarded() {
    let mock = common::start_mock_upstream().await;
    let mut config = common::relay_config(&mock);
    config.analytics.enabled = false;
    let relay = common::start_relay(config).await;

    let event = TrackEvent {
        event: "page_view".into(),
        anonymous_id: "anon".into(),
        properties: Map::new(),
        timestamp: None,
    };
    RelayClient::new(&relay.url).track(&event).await.unwrap();
    assert!(mock.state.tracked.lock().unwrap().is_empty());
}
