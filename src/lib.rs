//! # moonshot-sdk
//!
//! Async client for the Moonshot chat-completion service.
//!
//! ## Features
//!
//! - **Models, Balance, Tokenizer**: typed wrappers for the account endpoints
//! - **Validated Requests**: option ranges are checked before any network I/O
//! - **Token Budgeting**: `max_tokens` derived from the capacity in the model id
//! - **Error Classification**: remote failures matched against the documented error table
//! - **Sessions**: multi-turn conversations with message observers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moonshot_sdk::{Client, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(moonshot_sdk::DEFAULT_BASE_URL)?;
//!     let mut session = client.session(std::env::var("MOONSHOT_API_KEY")?, "moonshot-v1-8k");
//!
//!     let reply = session.send_turn("Hello!").await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod sdk;
pub mod selector;
pub mod session;
pub mod telemetry;
pub mod types;

pub use classify::{classify, ClassifiedError};
pub use config::MoonshotConfig;
pub use error::{SdkError, SdkResult};
pub use sdk::{ApiKey, ChatBuilder, ChatResponse, Client, ClientConfig, RequestContext, DEFAULT_BASE_URL};
pub use selector::{ChoiceSource, ResponseSelector};
pub use session::{ChannelObserver, MessageObserver, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
