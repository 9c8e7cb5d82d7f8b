//! Failure scenario integration tests

use std::time::Duration;

use super::common::*;
use assert_matches::assert_matches;
use moonshot_sdk::classify::{entries, UNKNOWN_DESCRIPTION};
use moonshot_sdk::types::{ChatOptions, MaxTokenPolicy, Message};
use moonshot_sdk::SdkError;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_authentication_error_classified() {
    let service = TestService::start().await;
    service
        .mock_json(
            "GET",
            "/v1/models",
            401,
            error_body("invalid_authentication_error", "Invalid Authentication"),
        )
        .await;

    let err = service.client.list_models(&service.ctx()).await.unwrap_err();
    let remote = err.remote().unwrap();
    assert_eq!(remote.code, 401);
    assert_eq!(remote.error_type, "invalid_authentication_error");
    assert_eq!(remote.message, "Invalid Authentication");
    assert_eq!(remote.description, entries()[8].description);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_error_classified() {
    let service = TestService::start().await;
    service
        .mock_json(
            "POST",
            "/v1/chat/completions",
            429,
            error_body(
                "rate_limit_reached_error",
                "Your account cn0a1b<ak-9x> request reached TPM rate limit, current:32113, limit:32000",
            ),
        )
        .await;

    let err = service
        .client
        .chat()
        .model(TEST_MODEL)
        .message("Hi")
        .send(&service.ctx())
        .await
        .unwrap_err();

    let remote = err.remote().unwrap();
    assert_eq!(remote.description, entries()[19].description);
    assert!(err.is_retryable());

    let report = err.to_string();
    assert!(report.starts_with("HTTP Status Code: 429\n"));
    assert!(report.contains("Error Type      : rate_limit_reached_error"));
}

#[tokio::test]
async fn test_token_limit_error_from_tokenizer() {
    let service = TestService::start().await;
    service
        .mock_json(
            "POST",
            "/v1/tokenizers/estimate-token-count",
            400,
            error_body("invalid_request_error", "Input token length too long"),
        )
        .await;
    service.forbid("POST", "/v1/chat/completions").await;

    let err = service
        .client
        .complete(
            &service.ctx(),
            TEST_MODEL,
            &[Message::user("x".repeat(100))],
            &ChatOptions::new().max_token_policy(MaxTokenPolicy::Max),
        )
        .await
        .unwrap_err();
    assert_eq!(err.remote().unwrap().description, entries()[2].description);
}

#[tokio::test]
async fn test_input_exceeding_capacity() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/tokenizers/estimate-token-count", 200, token_count_body(9000))
        .await;
    service.forbid("POST", "/v1/chat/completions").await;

    let err = service
        .client
        .complete(
            &service.ctx(),
            TEST_MODEL,
            &[Message::user("Hi")],
            &ChatOptions::new().max_token_policy(MaxTokenPolicy::Max),
        )
        .await
        .unwrap_err();
    assert_matches!(err, SdkError::Validation { field: Some("messages"), .. });
}

#[tokio::test]
async fn test_non_json_error_body() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/balance"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>502 Bad Gateway</html>"))
        .mount(&service.server)
        .await;

    let err = service.client.query_balance(&service.ctx()).await.unwrap_err();
    let remote = err.remote().unwrap();
    assert!(remote.is_unknown());
    assert_eq!(remote.code, -1);
    assert_eq!(remote.message, "<html>502 Bad Gateway</html>");
    assert_eq!(remote.description, UNKNOWN_DESCRIPTION);
}

#[tokio::test]
async fn test_unlisted_error_is_unknown() {
    let service = TestService::start().await;
    service
        .mock_json("GET", "/v1/models", 503, error_body("maintenance", "Back soon"))
        .await;

    let err = service.client.list_models(&service.ctx()).await.unwrap_err();
    let remote = err.remote().unwrap();
    assert!(remote.is_unknown());
    assert_eq!(remote.message, "unknown error");
}

#[tokio::test]
async fn test_unexpected_success_body() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/chat/completions", 200, serde_json::json!({"choices": []}))
        .await;

    let err = service
        .client
        .chat()
        .model(TEST_MODEL)
        .message("Hi")
        .send(&service.ctx())
        .await
        .unwrap_err();
    assert_matches!(err, SdkError::Parse(_));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_call() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(&[("late", "stop")]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&service.server)
        .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let ctx = service.ctx().with_cancellation(token);
    let started = std::time::Instant::now();
    let err = service
        .client
        .chat()
        .model(TEST_MODEL)
        .message("Hi")
        .send(&ctx)
        .await
        .unwrap_err();

    assert_matches!(err, SdkError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_request_timeout() {
    let service = TestService::start_with_timeout(Duration::from_millis(200)).await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&service.server)
        .await;

    let err = service.client.list_models(&service.ctx()).await.unwrap_err();
    assert_matches!(err, SdkError::Timeout);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused() {
    let client = moonshot_sdk::Client::new("http://127.0.0.1:1").unwrap();
    let err = client
        .list_models(&moonshot_sdk::RequestContext::new(TEST_KEY))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
