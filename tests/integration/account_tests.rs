//! Models, balance and tokenizer endpoint tests

use super::common::*;
use moonshot_sdk::types::Message;
use moonshot_sdk::RequestContext;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn models_body() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            {
                "id": "moonshot-v1-8k",
                "object": "model",
                "created": 1_711_000_000,
                "owned_by": "moonshot",
                "permission": [{
                    "created": 0,
                    "id": "",
                    "object": "",
                    "allow_create_engine": false,
                    "allow_sampling": true,
                    "allow_logprobs": true,
                    "allow_search_indices": false,
                    "allow_view": true,
                    "allow_fine_tuning": false,
                    "organization": "public",
                    "group": "public",
                    "is_blocking": false
                }],
                "root": "",
                "parent": ""
            },
            {"id": "moonshot-v1-32k", "object": "model", "owned_by": "moonshot"},
            {"id": "moonshot-v1-128k", "object": "model", "owned_by": "moonshot"}
        ]
    })
}

#[tokio::test]
async fn test_list_models() {
    let service = TestService::start().await;
    service.mock_json("GET", "/v1/models", 200, models_body()).await;

    let models = service.client.list_models(&service.ctx()).await.unwrap();
    assert_eq!(models.data.len(), 3);
    assert_eq!(models.data[0].owned_by, "moonshot");
    assert!(models.data[0].permission[0].allow_sampling);
    assert_eq!(models.data[0].permission[0].organization.as_deref(), Some("public"));
}

#[tokio::test]
async fn test_list_model_ids() {
    let service = TestService::start().await;
    service.mock_json("GET", "/v1/models", 200, models_body()).await;

    let ids = service.client.list_model_ids(&service.ctx()).await.unwrap();
    assert_eq!(ids, vec!["moonshot-v1-8k", "moonshot-v1-32k", "moonshot-v1-128k"]);
}

#[tokio::test]
async fn test_query_balance() {
    let service = TestService::start().await;
    service
        .mock_json(
            "GET",
            "/v1/users/me/balance",
            200,
            json!({
                "code": 0,
                "data": {
                    "available_balance": 49.58894,
                    "voucher_balance": 46.58893,
                    "cash_balance": 3.00001
                },
                "scode": "0x0",
                "status": true
            }),
        )
        .await;

    let balance = service.client.query_balance(&service.ctx()).await.unwrap();
    assert_eq!(balance.available_balance, 49.58894);
    assert_eq!(balance.voucher_balance, 46.58893);
    assert_eq!(balance.cash_balance, 3.00001);
}

#[tokio::test]
async fn test_estimate_token_count() {
    let service = TestService::start().await;
    service
        .mock_json("POST", "/v1/tokenizers/estimate-token-count", 200, token_count_body(80))
        .await;

    let messages = vec![Message::system("You are Kimi"), Message::user("Hello, my name is Li Lei")];
    let count = service
        .client
        .estimate_token_count(&service.ctx(), TEST_MODEL, &messages)
        .await
        .unwrap();
    assert_eq!(count, 80);

    let bodies = service.bodies("/v1/tokenizers/estimate-token-count").await;
    assert_eq!(bodies[0]["model"], TEST_MODEL);
    assert_eq!(bodies[0]["messages"][1]["content"], "Hello, my name is Li Lei");
}

#[tokio::test]
async fn test_credentials_are_per_call() {
    let service = TestService::start().await;
    for (key, id) in [("sk-alice", "alice-model-8k"), ("sk-bob", "bob-model-8k")] {
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", format!("Bearer {}", key).as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"object": "list", "data": [{"id": id}]})),
            )
            .expect(5)
            .mount(&service.server)
            .await;
    }

    let alice = RequestContext::new("sk-alice");
    let bob = RequestContext::new("sk-bob");

    for _ in 0..5 {
        let (a, b) = tokio::join!(
            service.client.list_model_ids(&alice),
            service.client.list_model_ids(&bob),
        );
        assert_eq!(a.unwrap(), vec!["alice-model-8k"]);
        assert_eq!(b.unwrap(), vec!["bob-model-8k"]);
    }
}
