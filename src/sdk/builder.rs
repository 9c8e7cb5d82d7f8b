//! Request Builders
//!
//! Fluent builder for chat completion requests.

use super::{Client, RequestContext};
use crate::error::{SdkError, SdkResult};
use crate::types::*;

/// Chat completion request builder
///
/// Starts with the client's default model and max-token policy.
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
///         .system("You are a helpful assistant.")
///         .message("What is the capital of France?")
///         .temperature(0.3)
///         .max()
///         .send(&ctx)
///         .await?;
///
///     println!("{}", response.content());
///     Ok(())
/// }
/// ```
pub struct ChatBuilder {
    client: Client,
    model: Option<String>,
    messages: Vec<Message>,
    options: ChatOptions,
}

impl ChatBuilder {
    /// Create a new chat builder
    pub fn new(client: Client) -> Self {
        let model = client.config().default_model.clone();
        let options =
            ChatOptions::new().max_token_policy(client.config().default_max_token_policy);

        Self {
            client,
            model,
            messages: Vec::new(),
            options,
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add a system message
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Add a user message
    pub fn message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Add an assistant message
    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    /// Add a raw message
    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Replace all options at once
    pub fn options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum tokens to generate
    pub fn max_tokens(mut self, tokens: u64) -> Self {
        self.options.max_tokens = Some(tokens);
        self
    }

    /// Spend whatever the model context has left after the input
    pub fn max(mut self) -> Self {
        self.options.max_token_policy = MaxTokenPolicy::Max;
        self
    }

    /// Set the temperature, in [0, 1]
    pub fn temperature(mut self, temp: f64) -> Self {
        self.options.temperature = Some(temp);
        self
    }

    /// Set the top_p parameter, in (0, 1)
    pub fn top_p(mut self, p: f64) -> Self {
        self.options.top_p = Some(p);
        self
    }

    /// Number of candidate replies, in [1, 5]
    pub fn n(mut self, n: u32) -> Self {
        self.options.n = Some(n);
        self
    }

    /// Set the presence penalty
    pub fn presence_penalty(mut self, penalty: f64) -> Self {
        self.options.presence_penalty = Some(penalty);
        self
    }

    /// Set the frequency penalty
    pub fn frequency_penalty(mut self, penalty: f64) -> Self {
        self.options.frequency_penalty = Some(penalty);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.options.response_format = Some(format);
        self
    }

    /// Set stop sequences
    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.options.stop = Some(sequences);
        self
    }

    /// Add a stop sequence
    pub fn add_stop(mut self, sequence: impl Into<String>) -> Self {
        self.options.stop.get_or_insert_with(Vec::new).push(sequence.into());
        self
    }

    /// Request streaming; rejected at validation
    pub fn stream(mut self, stream: bool) -> Self {
        self.options.stream = Some(stream);
        self
    }

    /// Build and validate the request without sending.
    ///
    /// The token budget is not resolved here; use [`prepare`](Self::prepare)
    /// for that.
    pub fn build(self) -> SdkResult<ChatCompletionRequest> {
        let model = require_model(self.model)?;
        ChatCompletionRequest::from_options(model, self.messages, &self.options)
    }

    /// Build, validate and resolve the token budget
    pub async fn prepare(self, ctx: &RequestContext) -> SdkResult<ChatCompletionRequest> {
        let model = require_model(self.model)?;
        self.client
            .prepare_request(ctx, model, self.messages, &self.options)
            .await
    }

    /// Send the request and get the selected reply
    pub async fn send(self, ctx: &RequestContext) -> SdkResult<ChatResponse> {
        let client = self.client.clone();
        let request = self.prepare(ctx).await?;
        client.send_chat(ctx, &request).await
    }
}

fn require_model(model: Option<String>) -> SdkResult<String> {
    model.ok_or_else(|| SdkError::validation("model", "model is required"))
}

/// A chat completion together with the reply picked from its choices
#[derive(Debug, Clone)]
pub struct ChatResponse {
    inner: ChatCompletionResponse,
    message: Message,
}

impl ChatResponse {
    pub fn new(response: ChatCompletionResponse, message: Message) -> Self {
        Self {
            inner: response,
            message,
        }
    }

    /// The selected reply
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Text of the selected reply
    pub fn content(&self) -> &str {
        &self.message.content
    }

    /// Get the response ID
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Get the model used
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Get usage information
    pub fn usage(&self) -> Option<&Usage> {
        self.inner.usage.as_ref()
    }

    /// Every candidate the service returned
    pub fn choices(&self) -> &[Choice] {
        &self.inner.choices
    }

    pub fn into_message(self) -> Message {
        self.message
    }

    /// Get the underlying response
    pub fn inner(&self) -> &ChatCompletionResponse {
        &self.inner
    }
}
