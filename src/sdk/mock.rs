//! Scripted transport for unit tests

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;

use super::{RawResponse, RequestContext, Transport};
use crate::error::{SdkError, SdkResult};

/// One request as seen by the transport
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub api_key: String,
}

/// Replays queued responses in order and records every call
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<SdkResult<RawResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.responses.lock().push_back(Ok(RawResponse::new(status, body.to_string())));
        self
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.responses.lock().push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: SdkError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SdkResult<RawResponse> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
            api_key: ctx.api_key().expose().to_string(),
        });

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SdkError::Connection("no scripted response".to_string())))
    }
}

/// A chat completion body with one choice per `(content, finish_reason)`
pub fn completion(choices: &[(&str, &str)]) -> serde_json::Value {
    let choices: Vec<_> = choices
        .iter()
        .enumerate()
        .map(|(i, (content, reason))| {
            serde_json::json!({
                "index": i,
                "message": {"role": "assistant", "content": content},
                "finish_reason": reason,
            })
        })
        .collect();

    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "moonshot-v1-8k",
        "choices": choices,
        "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12},
    })
}
