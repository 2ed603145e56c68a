//! Wire-level behavior of the reqwest transport against a local mock
//! provider proxy.

use genrelay::retry::{BackoffPolicy, FailureClass};
use genrelay::transport::{HttpTransport, TransportClient, TransportError};
use serde_json::json;

#[tokio::test]
async fn parses_a_successful_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "text": "a haiku",
                "model": "creative-1",
                "request_id": "req-123",
                "usage": { "tokens": 17 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/generate", server.url())).unwrap();
    let result = transport.call(&json!({ "prompt": "haiku" })).await.unwrap();

    assert_eq!(result.text, "a haiku");
    let metadata = result.metadata.unwrap();
    assert_eq!(metadata.model.as_deref(), Some("creative-1"));
    assert_eq!(metadata.request_id.as_deref(), Some("req-123"));
    mock.assert_async().await;
}

#[tokio::test]
async fn reply_without_optional_fields_still_parses() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(json!({ "text": "bare" }).to_string())
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/generate", server.url())).unwrap();
    let result = transport.call(&json!({ "prompt": "x" })).await.unwrap();
    assert_eq!(result.text, "bare");
    // correlation id fills in when the provider sends none
    assert!(result.metadata.unwrap().request_id.is_some());
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/generate", server.url())).unwrap();
    let err = transport.call(&json!({ "prompt": "x" })).await.unwrap_err();
    match &err {
        TransportError::Status { status, message } => {
            assert_eq!(*status, 429);
            assert!(message.contains("slow down"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(
        BackoffPolicy::default().classify(&err),
        FailureClass::Transient
    );
}

#[tokio::test]
async fn unparseable_body_maps_to_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/generate", server.url())).unwrap();
    let err = transport.call(&json!({ "prompt": "x" })).await.unwrap_err();
    assert!(matches!(err, TransportError::Malformed(_)));
    assert_eq!(BackoffPolicy::default().classify(&err), FailureClass::Fatal);
}

#[tokio::test]
async fn connection_failure_maps_to_network() {
    // nothing listens on this port
    let transport = HttpTransport::new("http://127.0.0.1:9/generate").unwrap();
    let err = transport.call(&json!({ "prompt": "x" })).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
    assert_eq!(
        BackoffPolicy::default().classify(&err),
        FailureClass::Transient
    );
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(json!({ "text": "authed" }).to_string())
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/generate", server.url()))
        .unwrap()
        .with_api_key("sk-test");
    let result = transport.call(&json!({ "prompt": "x" })).await.unwrap();
    assert_eq!(result.text, "authed");
    mock.assert_async().await;
}
