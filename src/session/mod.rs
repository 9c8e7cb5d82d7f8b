//! Multi-turn conversations
//!
//! A [`Session`] owns an append-only history and sends all of it with every
//! turn. State lives entirely on the client; the service has no notion of a
//! session.
//!
//! When a turn fails the user message stays in the history (a dangling turn).
//! Callers who want a different policy can drive the two halves of a turn
//! themselves with [`Session::push_user`] and [`Session::complete_turn`], or
//! rebuild a session from a trimmed [`Session::history`] with
//! [`Session::with_history`].

mod observer;

pub use observer::*;

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::SdkResult;
use crate::sdk::{Client, RequestContext};
use crate::types::{ChatOptions, Message};

/// Ordered conversation with one model under one API key
pub struct Session {
    client: Client,
    ctx: RequestContext,
    model: String,
    options: ChatOptions,
    history: Vec<Message>,
    observers: Vec<Arc<dyn MessageObserver>>,
}

impl Session {
    pub fn new(client: Client, ctx: RequestContext, model: impl Into<String>) -> Self {
        let options =
            ChatOptions::new().max_token_policy(client.config().default_max_token_policy);

        Self {
            client,
            ctx,
            model: model.into(),
            options,
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Options sent with every turn
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Start from an existing history. Observers are not notified.
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// Register an observer for every future append
    pub fn subscribe(&mut self, observer: Arc<dyn MessageObserver>) {
        self.observers.push(observer);
    }

    /// Register a closure for every future append
    pub fn on_message<F>(&mut self, f: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(f));
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Whether the last message is a user message still waiting for a reply
    pub fn is_dangling(&self) -> bool {
        self.history.last().map_or(false, Message::is_user)
    }

    /// First half of a turn: append a user message and notify observers
    pub fn push_user(&mut self, text: impl Into<String>) -> &Message {
        self.append(Message::user(text));
        &self.history[self.history.len() - 1]
    }

    /// Second half of a turn: send the whole history and append the reply
    pub async fn complete_turn(&mut self) -> SdkResult<String> {
        let ctx = self.ctx.clone();
        self.complete_with_context(&ctx).await
    }

    /// [`complete_turn`](Self::complete_turn) with its own cancellation token
    pub async fn complete_turn_with(&mut self, cancel: CancellationToken) -> SdkResult<String> {
        let ctx = self.ctx.clone().with_cancellation(cancel);
        self.complete_with_context(&ctx).await
    }

    /// Send `text` and return the reply.
    ///
    /// On failure the user message remains in the history.
    pub async fn send_turn(&mut self, text: impl Into<String>) -> SdkResult<String> {
        self.push_user(text);
        self.complete_turn().await
    }

    /// [`send_turn`](Self::send_turn) with its own cancellation token
    pub async fn send_turn_with(
        &mut self,
        text: impl Into<String>,
        cancel: CancellationToken,
    ) -> SdkResult<String> {
        self.push_user(text);
        self.complete_turn_with(cancel).await
    }

    async fn complete_with_context(&mut self, ctx: &RequestContext) -> SdkResult<String> {
        let reply = self
            .client
            .complete(ctx, &self.model, &self.history, &self.options)
            .await?;
        let content = reply.content.clone();
        self.append(reply);
        Ok(content)
    }

    fn append(&mut self, message: Message) {
        debug!(role = %message.role, position = self.history.len(), "Message appended");
        self.history.push(message);
        if let Some(added) = self.history.last() {
            for observer in &self.observers {
                observer.message_added(added);
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model)
            .field("options", &self.options)
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
