//! API types for the Moonshot service
//!
//! Request and response payloads for the models, balance, tokenizer and
//! chat-completion endpoints. Field names follow the wire format exactly.

mod messages;
mod request;
mod response;

pub use messages::*;
pub use request::*;
pub use response::*;

use serde::{Deserialize, Serialize};

/// Finish reason reported for a natural, complete generation
pub const FINISH_REASON_STOP: &str = "stop";

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
