//! Multi-turn session integration tests

use std::sync::Arc;

use super::common::*;
use moonshot_sdk::types::{ChatOptions, Message};
use moonshot_sdk::{ChannelObserver, SdkError, Session};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_history_grows_by_two_per_turn() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/chat/completions", 200, completion_body(&[("noted", "stop")]))
        .await;

    let mut session = service.client.session(TEST_KEY, TEST_MODEL);
    let turns = ["Hello, my name is Li Lei", "What is 1+1?", "What is my name?"];

    for (i, text) in turns.iter().enumerate() {
        assert_eq!(session.send_turn(*text).await.unwrap(), "noted");
        assert_eq!(session.len(), 2 * (i + 1));
    }

    for (i, message) in session.history().iter().enumerate() {
        let expected = if i % 2 == 0 { "user" } else { "assistant" };
        assert_eq!(message.role, expected);
    }

    let bodies = service.bodies("/v1/chat/completions").await;
    assert_eq!(bodies.len(), 3);
    for (i, body) in bodies.iter().enumerate() {
        assert_eq!(body["model"], TEST_MODEL);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2 * i + 1);
    }
    assert_eq!(bodies[2]["messages"][0]["content"], "Hello, my name is Li Lei");
}

#[tokio::test]
async fn test_observer_stream() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/chat/completions", 200, completion_body(&[("pong", "stop")]))
        .await;

    let mut session = service.client.session(TEST_KEY, TEST_MODEL);
    let (observer, mut events) = ChannelObserver::channel();
    session.subscribe(Arc::new(observer));

    session.send_turn("ping").await.unwrap();
    session.send_turn("ping again").await.unwrap();
    drop(session);

    let mut seen = Vec::new();
    while let Some(message) = events.recv().await {
        seen.push(message);
    }
    assert_eq!(
        seen,
        vec![
            Message::user("ping"),
            Message::assistant("pong"),
            Message::user("ping again"),
            Message::assistant("pong"),
        ]
    );
}

#[tokio::test]
async fn test_dangling_turn_after_failure() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body("unexpected_output", "invalid state transition")))
        .up_to_n_times(1)
        .mount(&service.server)
        .await;
    service
        .mock_json("POST", "/v1/chat/completions", 200, completion_body(&[("fine now", "stop")]))
        .await;

    let mut session = service.client.session(TEST_KEY, TEST_MODEL);
    let err = session.send_turn("first").await.unwrap_err();
    assert!(matches!(err, SdkError::Remote(_)));
    assert!(session.is_dangling());
    assert_eq!(session.history(), &[Message::user("first")]);

    // caller-chosen policy: drop the unanswered message and retry
    let mut history = session.history().to_vec();
    history.pop();
    let mut session = Session::new(service.client.clone(), service.ctx(), TEST_MODEL).with_history(history);

    assert_eq!(session.send_turn("first").await.unwrap(), "fine now");
    assert_eq!(session.len(), 2);
    assert!(!session.is_dangling());
}

#[tokio::test]
async fn test_two_step_turn() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/chat/completions", 200, completion_body(&[("42", "stop")]))
        .await;

    let mut session = service
        .client
        .session(TEST_KEY, TEST_MODEL)
        .with_options(ChatOptions::new().temperature(0.3))
        .with_history(vec![Message::system("Answer with a number")]);

    session.push_user("What is six times seven?");
    assert!(session.is_dangling());
    assert_eq!(session.complete_turn().await.unwrap(), "42");
    assert_eq!(session.len(), 3);

    let body = &service.bodies("/v1/chat/completions").await[0];
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["messages"][0]["role"], "system");
}
