//! SDK Client
//!
//! The main client for the Moonshot service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use super::{
    ApiKey, ChatBuilder, ChatResponse, ClientConfig, HttpTransport, RequestContext, Transport,
};
use crate::budget;
use crate::classify::classify;
use crate::error::{SdkError, SdkResult};
use crate::selector::ResponseSelector;
use crate::session::Session;
use crate::telemetry::RequestSpan;
use crate::types::*;

/// Model listing endpoint
pub const MODELS_PATH: &str = "/v1/models";
/// Account balance endpoint
pub const BALANCE_PATH: &str = "/v1/users/me/balance";
/// Tokenizer endpoint
pub const TOKEN_ESTIMATE_PATH: &str = "/v1/tokenizers/estimate-token-count";
/// Chat completion endpoint
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Moonshot SDK Client
///
/// Cheap to clone; clones share the connection pool. Every remote call takes a
/// [`RequestContext`] carrying the API key and a cancellation token.
///
/// # Example
///
/// ```rust,no_run
/// use moonshot_sdk::sdk::{Client, RequestContext};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Client::new("https://api.moonshot.cn")?;
///     let ctx = RequestContext::new("sk-...");
///
///     let response = client
///         .chat()
///         .model("moonshot-v1-8k")
///         .message("Hello!")
///         .send(&ctx)
///         .await?;
///
///     println!("{}", response.content());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    selector: ResponseSelector,
}

impl Client {
    /// Create a new client with the given base URL
    pub fn new(base_url: impl Into<String>) -> SdkResult<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a new client with the given configuration
    pub fn with_config(config: ClientConfig) -> SdkResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let selector = match config.selector_seed {
            Some(seed) => ResponseSelector::seeded(seed),
            None => ResponseSelector::random(),
        };

        Self {
            transport,
            config: Arc::new(config),
            selector,
        }
    }

    /// Replace the reply selector
    pub fn with_selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Create a new client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    /// Create a chat completion builder
    pub fn chat(&self) -> ChatBuilder {
        ChatBuilder::new(self.clone())
    }

    /// Start an empty conversation bound to `model`
    pub fn session(&self, api_key: impl Into<ApiKey>, model: impl Into<String>) -> Session {
        Session::new(self.clone(), RequestContext::new(api_key), model)
    }

    /// List available models
    pub async fn list_models(&self, ctx: &RequestContext) -> SdkResult<ModelsResponse> {
        self.execute(ctx, Method::GET, MODELS_PATH, None).await
    }

    /// Ids of the available models, in service order
    pub async fn list_model_ids(&self, ctx: &RequestContext) -> SdkResult<Vec<String>> {
        let models = self.list_models(ctx).await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    /// Query the account balance
    pub async fn query_balance(&self, ctx: &RequestContext) -> SdkResult<Balance> {
        let response: BalanceResponse = self.execute(ctx, Method::GET, BALANCE_PATH, None).await?;
        Ok(response.data)
    }

    /// Ask the service tokenizer how many tokens `messages` take under `model`
    pub async fn estimate_token_count(
        &self,
        ctx: &RequestContext,
        model: &str,
        messages: &[Message],
    ) -> SdkResult<u64> {
        let body = serde_json::to_value(TokenEstimateRequest { model, messages })?;
        let response: TokenEstimateResponse =
            self.execute(ctx, Method::POST, TOKEN_ESTIMATE_PATH, Some(body)).await?;
        Ok(response.data.total_tokens)
    }

    /// Output tokens `model` has left once `messages` are counted.
    ///
    /// A model id without a readable capacity fails before the tokenizer is
    /// called.
    pub async fn resolve_max_tokens(
        &self,
        ctx: &RequestContext,
        model: &str,
        messages: &[Message],
    ) -> SdkResult<u64> {
        let capacity = budget::model_capacity(model)?;
        let input = self.estimate_token_count(ctx, model, messages).await?;
        let max_tokens = budget::remaining(capacity, input)?;
        tracing::debug!(model, capacity, input, max_tokens, "Resolved token budget");
        Ok(max_tokens)
    }

    /// Validate and build a request, resolving the token budget when the
    /// options ask for it
    pub async fn prepare_request(
        &self,
        ctx: &RequestContext,
        model: impl Into<String>,
        messages: Vec<Message>,
        options: &ChatOptions,
    ) -> SdkResult<ChatCompletionRequest> {
        let mut request = ChatCompletionRequest::from_options(model, messages, options)?;
        if options.needs_budget() {
            let max_tokens = self
                .resolve_max_tokens(ctx, &request.model, &request.messages)
                .await?;
            request.max_tokens = Some(max_tokens);
        }
        Ok(request)
    }

    /// Send a raw chat completion request
    pub async fn chat_completion(
        &self,
        ctx: &RequestContext,
        request: &ChatCompletionRequest,
    ) -> SdkResult<ChatCompletionResponse> {
        request.validate()?;
        let body = serde_json::to_value(request)?;
        self.execute(ctx, Method::POST, CHAT_COMPLETIONS_PATH, Some(body)).await
    }

    /// Send a chat completion request and select one reply
    pub async fn send_chat(
        &self,
        ctx: &RequestContext,
        request: &ChatCompletionRequest,
    ) -> SdkResult<ChatResponse> {
        let response = self.chat_completion(ctx, request).await?;
        let message = self.selector.select(&response.choices)?.message.clone();
        Ok(ChatResponse::new(response, message))
    }

    /// Validate, budget, send and select in one step
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> SdkResult<Message> {
        let request = self.prepare_request(ctx, model, messages.to_vec(), options).await?;
        Ok(self.send_chat(ctx, &request).await?.into_message())
    }

    /// Run one exchange: cancellation, logging and error classification
    async fn execute<R>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> SdkResult<R>
    where
        R: DeserializeOwned,
    {
        let call = RequestSpan::start(method.as_str(), path);
        let exchange = self
            .transport
            .send(ctx, method, path, body.as_ref())
            .instrument(call.span().clone());

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(SdkError::Cancelled),
            result = exchange => result,
        };

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                call.fail(&e);
                return Err(e);
            }
        };
        call.finish(raw.status);

        if !raw.is_success() {
            let err = SdkError::Remote(classify(raw.status, &raw.body));
            call.fail(&err);
            return Err(err);
        }

        serde_json::from_str(&raw.body).map_err(|e| {
            let err = SdkError::Parse(format!("unexpected response from {}: {}", path, e));
            call.fail(&err);
            err
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client builder for fluent configuration
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    selector: Option<ResponseSelector>,
}

impl ClientBuilder {
    /// Start from an existing configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = Some(model.into());
        self
    }

    /// Set the default max-token policy
    pub fn default_max_token_policy(mut self, policy: MaxTokenPolicy) -> Self {
        self.config.default_max_token_policy = policy;
        self
    }

    /// Seed reply selection
    pub fn selector_seed(mut self, seed: u64) -> Self {
        self.config.selector_seed = Some(seed);
        self
    }

    /// Use a custom transport instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom reply selector
    pub fn selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Build the client
    pub fn build(self) -> SdkResult<Client> {
        let client = match self.transport {
            Some(transport) => {
                self.config.validate()?;
                Client::with_transport(self.config, transport)
            }
            None => Client::with_config(self.config)?,
        };

        Ok(match self.selector {
            Some(selector) => client.with_selector(selector),
            None => client,
        })
    }
}
