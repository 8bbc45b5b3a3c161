//! Wire-level tests for the Gemini generation client against a mock server

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use travel_planner::config::GeminiConfig;
use travel_planner::generate::{GeminiClient, Generator};
use travel_planner::{PlannerConfig, PlannerError};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig {
        api_key: Some("test_api_key_123".to_string()),
        base_url: server.uri(),
        max_retries: 0,
        ..PlannerConfig::default().gemini
    };
    GeminiClient::new(&config).expect("client construction with a key succeeds")
}

#[tokio::test]
async fn generate_sends_single_user_message_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test_api_key_123"))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": "Find travel options from Pune to Mumbai"}]
            }],
            "generationConfig": {"temperature": 0.7}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Option A..."}]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .generate("Find travel options from Pune to Mumbai")
        .await
        .unwrap();
    assert_eq!(text, "Option A...");
}

#[tokio::test]
async fn auth_failure_maps_to_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, PlannerError::Generation { .. }));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn server_error_message_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("backend exploded, try again later"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("anything").await.unwrap_err();
    assert!(err.to_string().contains("backend exploded, try again later"));
}

#[tokio::test]
async fn empty_candidates_are_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("anything").await.unwrap_err();
    assert!(err.to_string().contains("no candidates"));
}

#[tokio::test]
async fn malformed_response_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, PlannerError::Generation { .. }));
}

#[tokio::test]
async fn transient_server_errors_retry_before_succeeding() {
    let server = MockServer::start().await;

    // First attempt fails, the retry policy tries again and succeeds
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "recovered"}]}
            }]
        })))
        .mount(&server)
        .await;

    let config = GeminiConfig {
        api_key: Some("test_api_key_123".to_string()),
        base_url: server.uri(),
        max_retries: 2,
        retry_initial_seconds: 1,
        ..PlannerConfig::default().gemini
    };
    let client = GeminiClient::new(&config).unwrap();

    let text = client.generate("anything").await.unwrap();
    assert_eq!(text, "recovered");
}
