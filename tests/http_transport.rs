//! HTTP-level tests against a local mock server.

use std::time::Duration;

use anura::{Anura, Config, Error, Message};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM: &str = concat!(
    "event: start\n",
    "data: job-abc123\n",
    "\n",
    "data: {\"model\":\"m\",\"created_at\":\"t\",\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
    "not json at all\n",
    "data: {\"model\":\"m\",\"created_at\":\"t\",\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":true}\n",
);

async fn client_for(server: &MockServer) -> Anura {
    client_with_timeout(server, Duration::from_secs(30)).await
}

async fn client_with_timeout(server: &MockServer, timeout: Duration) -> Anura {
    let config = Config::new("test-key")
        .unwrap()
        .with_base_url(&format!("{}/api/v1", server.uri()))
        .unwrap()
        .with_timeout(timeout);
    Anura::new(config).unwrap()
}

#[tokio::test]
async fn completion_stream_is_reconstructed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "model": "qwen2.5:7b",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": "Say hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(STREAM))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let messages = vec![
        Message::system("You are a helpful assistant."),
        Message::user("Say hello"),
    ];
    let response = client.complete_chat("qwen2.5:7b", &messages).await.unwrap();
    assert_eq!(response.text, "Hello");
    assert_eq!(response.job_id.as_deref(), Some("job-abc123"));
    assert_eq!(response.skipped, 1);
    assert!(response.done);
}

#[tokio::test]
async fn unauthorized_completion_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .complete_chat("qwen2.5:7b", &[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        Error::HttpStatus { status_code: 401, body } if body == "unauthorized"
    ));
    assert!(err.partial_response().is_none());
}

#[tokio::test]
async fn models_are_listed_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data":{"models":["a","b"]},"message":"ok","status":200}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn malformed_models_envelope_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"models":"a,b"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.list_models().await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn models_status_error_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.list_models().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.body(), Some("maintenance"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    drop(server);

    let err = client.list_models().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err}");
}

#[tokio::test]
async fn slow_completion_is_not_cut_off_by_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(STREAM)
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server, Duration::from_secs(1)).await;
    let response = client
        .complete_chat("qwen2.5:7b", &[Message::user("hi")])
        .await
        .unwrap();
    assert_eq!(response.text, "Hello");
}

#[tokio::test]
async fn slow_model_listing_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":{"models":["a"]},"message":"ok","status":200}"#)
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server, Duration::from_millis(300)).await;
    let err = client.list_models().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "unexpected error: {err}");
}
