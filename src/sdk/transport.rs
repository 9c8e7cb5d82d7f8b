//! HTTP transport
//!
//! One shared `reqwest::Client` (and its connection pool) per [`HttpTransport`].
//! The bearer credential is attached to each request from its
//! [`RequestContext`]; the pool never holds it as default state.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;

use super::{ClientConfig, RequestContext};
use crate::error::SdkResult;

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request to the service and returns whatever came back.
///
/// Non-success statuses are not errors at this level; they are classified by
/// the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SdkResult<RawResponse>;
}

/// `reqwest` backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("moonshot-sdk")),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(32)
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SdkResult<RawResponse> {
        let url = self.config.endpoint(path);
        let mut req = self
            .http
            .request(method, &url)
            .bearer_auth(ctx.api_key().expose());

        if let Some(b) = body {
            req = req.json(b);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
