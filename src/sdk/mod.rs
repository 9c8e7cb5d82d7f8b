//! Moonshot SDK client
//!
//! # Features
//!
//! - **Async/Await Support**: every remote call is async and cancellable
//! - **Per-call Credentials**: the API key travels in a [`RequestContext`]
//! - **Connection Pooling**: one shared HTTP client per [`Client`]
//! - **Token Budgeting**: optional `max_tokens` resolution from the model id
//! - **Type Safety**: strongly typed requests and responses
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use moonshot_sdk::sdk::{Client, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new("https://api.moonshot.cn")?;
//!     let ctx = RequestContext::new(std::env::var("MOONSHOT_API_KEY")?);
//!
//!     for id in client.list_model_ids(&ctx).await? {
//!         println!("{}", id);
//!     }
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod config;
mod context;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use builder::*;
pub use client::*;
pub use config::*;
pub use context::*;
pub use transport::*;

// Re-export types for convenience
pub use crate::error::{SdkError, SdkResult};
pub use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatOptions, MaxTokenPolicy, Message,
    ResponseFormat, Usage,
};
