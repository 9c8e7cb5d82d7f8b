//! Message types for chat completions

use serde::{Deserialize, Serialize};

/// Role tag for system prompts
pub const ROLE_SYSTEM: &str = "system";
/// Role tag for caller-authored messages
pub const ROLE_USER: &str = "user";
/// Role tag for model replies
pub const ROLE_ASSISTANT: &str = "assistant";

/// A message in a chat conversation.
///
/// The role is an open tag; the service currently understands `system`,
/// `user` and `assistant`, but any string is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }

    pub fn is_assistant(&self) -> bool {
        self.role == ROLE_ASSISTANT
    }
}

/// Response format specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
}

impl std::str::FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" | "json_object" => Ok(Self::JsonObject),
            _ => Err(format!("Unknown response format: {}", s)),
        }
    }
}
